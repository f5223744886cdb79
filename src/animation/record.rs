//! Built animations.
//!
//! An [`AnimationRecord`] is the immutable result of parsing one animation:
//! playback parameters plus up to five keyframe channels. A channel exists
//! only if at least one frame contributed a value to it.

use serde::{Deserialize, Serialize};

use crate::animation::frame::{Frame, FrameKind};
use crate::animation::timing::Easing;
use crate::animation::tracks::KeyframeTrack;
use crate::animation::values::AxisValues;
use crate::markup::TransformComponents;
use crate::resources::style::MaterialParams;
use crate::utils::color::Rgb;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channels {
    pub position: Option<KeyframeTrack<AxisValues>>,
    /// Euler XYZ angles in radians.
    pub rotation: Option<KeyframeTrack<AxisValues>>,
    pub scale: Option<KeyframeTrack<AxisValues>>,
    pub opacity: Option<KeyframeTrack<f32>>,
    pub color: Option<KeyframeTrack<Rgb>>,
}

impl Channels {
    /// Number of populated channels.
    #[must_use]
    pub fn count(&self) -> usize {
        [
            self.position.is_some(),
            self.rotation.is_some(),
            self.scale.is_some(),
            self.opacity.is_some(),
            self.color.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Whether any channel drives the node's material.
    #[must_use]
    pub fn has_material_channels(&self) -> bool {
        self.opacity.is_some() || self.color.is_some()
    }

    fn push_transform(&mut self, time: f32, t: &TransformComponents) {
        if t.has_position() {
            push(&mut self.position, time, AxisValues::new(t.x, t.y, t.z));
        }
        if t.has_rotation() {
            push(&mut self.rotation, time, AxisValues::new(t.rx, t.ry, t.rz));
        }
        if t.has_scale() {
            push(&mut self.scale, time, AxisValues::new(t.sx, t.sy, t.sz));
        }
    }

    fn push_material(&mut self, time: f32, params: &MaterialParams) {
        if let Some(opacity) = params.opacity {
            push(&mut self.opacity, time, opacity);
        }
        if let Some(color) = params.color {
            push(&mut self.color, time, Rgb::from_hex(color));
        }
    }
}

fn push<T>(slot: &mut Option<KeyframeTrack<T>>, time: f32, value: T) {
    slot.get_or_insert_with(KeyframeTrack::default).push(time, value);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationRecord {
    /// Milliseconds.
    pub duration: f32,
    pub looping: bool,
    pub easing: Easing,
    pub channels: Channels,
}

impl AnimationRecord {
    /// Builds a record from frames.
    ///
    /// Frames are appended in the order given and are not sorted; callers
    /// supply them in ascending time order. A single frame may feed several
    /// channels.
    #[must_use]
    pub fn build(duration: f32, looping: bool, easing: Easing, frames: &[Frame]) -> Self {
        let mut channels = Channels::default();
        for frame in frames {
            match &frame.kind {
                FrameKind::Transform(t) => channels.push_transform(frame.time, t),
                FrameKind::Material(params) => channels.push_material(frame.time, params),
            }
        }

        log::debug!(
            "Built animation: {duration}ms, loop={looping}, {} frame(s), {} channel(s)",
            frames.len(),
            channels.count()
        );

        Self {
            duration,
            looping,
            easing,
            channels,
        }
    }
}
