use serde::{Deserialize, Serialize};

use crate::animation::tracks::KeyframeTrack;
use crate::animation::values::AxisValues;
use crate::utils::color::Rgb;

/// The node property an animation channel drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPath {
    /// `transform.position`
    Position,
    /// `transform.rotation`, as Euler XYZ angles
    Rotation,
    /// `transform.scale`
    Scale,
    /// `visuals[0].material.opacity`
    Opacity,
    /// `visuals[0].material.color`
    Color,
}

impl TargetPath {
    /// Whether the target lives on the node's first material rather than on
    /// its transform.
    #[must_use]
    pub fn is_material(self) -> bool {
        matches!(self, Self::Opacity | Self::Color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackData {
    Axes(KeyframeTrack<AxisValues>),
    Scalar(KeyframeTrack<f32>),
    Color(KeyframeTrack<Rgb>),
}

impl TrackData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Axes(t) => t.len(),
            Self::Scalar(t) => t.len(),
            Self::Color(t) => t.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One channel bound to its target: the `{keys, values, target}`
/// descriptor handed to the animator.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    pub track: TrackData,
    pub target: TargetPath,
}
