use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::utils::color::Rgb;

pub trait Interpolatable: Clone + Sized {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self;
}

/// A partial three-axis value. Position, rotation (Euler XYZ, radians) and
/// scale keyframes only carry the axes the markup mentioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl AxisValues {
    #[inline]
    #[must_use]
    pub const fn new(x: Option<f32>, y: Option<f32>, z: Option<f32>) -> Self {
        Self { x, y, z }
    }

    #[inline]
    #[must_use]
    pub fn x(x: f32) -> Self {
        Self::new(Some(x), None, None)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }

    /// Overwrites the axes present in `self`, keeping the rest of `base`.
    #[must_use]
    pub fn apply_to(&self, base: Vec3) -> Vec3 {
        Vec3::new(
            self.x.unwrap_or(base.x),
            self.y.unwrap_or(base.y),
            self.z.unwrap_or(base.z),
        )
    }
}

fn lerp_axis(start: Option<f32>, end: Option<f32>, t: f32) -> Option<f32> {
    match (start, end) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        // An axis missing on one side holds the value of the other side.
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

impl Interpolatable for AxisValues {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        Self {
            x: lerp_axis(start.x, end.x, t),
            y: lerp_axis(start.y, end.y, t),
            z: lerp_axis(start.z, end.z, t),
        }
    }
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Rgb {
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        Rgb::from_vec3(start.to_vec3().lerp(end.to_vec3(), t))
    }
}
