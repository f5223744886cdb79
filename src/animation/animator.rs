//! Keyframe playback.

use crate::animation::binding::{Interpolation, TargetPath, TrackData};
use crate::animation::timing::Easing;
use crate::animation::tracks::KeyframeCursor;
use crate::scene::{Node, NodeHandle};

/// Plays a set of interpolations on one node.
///
/// Time is in milliseconds. Every interpolation is sampled at the same
/// eased, normalized time, so all channels share duration, looping and
/// easing.
#[derive(Debug, Clone)]
pub struct KeyFrameAnimator {
    node: NodeHandle,
    interps: Vec<Interpolation>,
    cursors: Vec<KeyframeCursor>,

    pub duration: f32,
    pub looping: bool,
    pub easing: Easing,

    time: f32,
    running: bool,
}

impl KeyFrameAnimator {
    #[must_use]
    pub fn new(
        node: NodeHandle,
        interps: Vec<Interpolation>,
        duration: f32,
        looping: bool,
        easing: Easing,
    ) -> Self {
        let cursors = vec![KeyframeCursor::default(); interps.len()];
        Self {
            node,
            interps,
            cursors,
            duration,
            looping,
            easing,
            time: 0.0,
            running: false,
        }
    }

    /// Starts playback from the beginning.
    pub fn start(&mut self) {
        self.time = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    /// Elapsed time within the current iteration, in milliseconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub fn interpolations(&self) -> &[Interpolation] {
        &self.interps
    }

    /// Linear progress in `[0, 1]` before easing.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.time / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Advances time by `dt` milliseconds and writes the sampled values to
    /// `node`. A non-looping animator writes its final values once and
    /// stops.
    pub fn update(&mut self, dt: f32, node: &mut Node) {
        if !self.running {
            return;
        }

        let mut finished = false;
        if self.duration <= 0.0 {
            finished = true;
        } else {
            self.time += dt;
            if self.time >= self.duration {
                if self.looping {
                    self.time %= self.duration;
                } else {
                    self.time = self.duration;
                    finished = true;
                }
            }
        }

        let t = self.easing.apply(self.progress());
        self.apply(t, node);

        if finished {
            self.running = false;
        }
    }

    fn apply(&mut self, t: f32, node: &mut Node) {
        let mut transform_changed = false;

        for (interp, cursor) in self.interps.iter().zip(self.cursors.iter_mut()) {
            match (&interp.track, interp.target) {
                (TrackData::Axes(track), TargetPath::Position) => {
                    if let Some(v) = track.sample_with_cursor(t, cursor) {
                        node.transform.position = v.apply_to(node.transform.position);
                        transform_changed = true;
                    }
                }
                (TrackData::Axes(track), TargetPath::Rotation) => {
                    if let Some(v) = track.sample_with_cursor(t, cursor) {
                        let euler = v.apply_to(node.transform.rotation_euler());
                        node.transform.set_rotation_euler(euler.x, euler.y, euler.z);
                        transform_changed = true;
                    }
                }
                (TrackData::Axes(track), TargetPath::Scale) => {
                    if let Some(v) = track.sample_with_cursor(t, cursor) {
                        node.transform.scale = v.apply_to(node.transform.scale);
                        transform_changed = true;
                    }
                }
                (TrackData::Scalar(track), TargetPath::Opacity) => {
                    if let Some(v) = track.sample_with_cursor(t, cursor)
                        && let Some(material) = node.mesh_material_mut()
                    {
                        material.set_opacity(v);
                    }
                }
                (TrackData::Color(track), TargetPath::Color) => {
                    if let Some(v) = track.sample_with_cursor(t, cursor)
                        && let Some(material) = node.mesh_material_mut()
                    {
                        material.set_color(v);
                    }
                }
                (_, target) => {
                    log::warn!("Track type does not match target {target:?}");
                }
            }
        }

        if transform_changed {
            node.transform.mark_dirty();
        }
    }
}
