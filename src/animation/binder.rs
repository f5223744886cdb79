use crate::animation::animator::KeyFrameAnimator;
use crate::animation::binding::{Interpolation, TargetPath, TrackData};
use crate::animation::record::AnimationRecord;
use crate::errors::{PrismError, Result};
use crate::scene::{AnimatorKey, NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// One interpolation per populated channel, in channel order.
    #[must_use]
    pub fn interpolations(record: &AnimationRecord) -> Vec<Interpolation> {
        let channels = &record.channels;
        let mut interps = Vec::with_capacity(channels.count());

        let axes = [
            (&channels.position, TargetPath::Position),
            (&channels.rotation, TargetPath::Rotation),
            (&channels.scale, TargetPath::Scale),
        ];
        for (track, target) in axes {
            if let Some(track) = track {
                interps.push(Interpolation {
                    track: TrackData::Axes(track.clone()),
                    target,
                });
            }
        }
        if let Some(track) = &channels.opacity {
            interps.push(Interpolation {
                track: TrackData::Scalar(track.clone()),
                target: TargetPath::Opacity,
            });
        }
        if let Some(track) = &channels.color {
            interps.push(Interpolation {
                track: TrackData::Color(track.clone()),
                target: TargetPath::Color,
            });
        }

        interps
    }

    /// Attaches `record` to `node` and starts playback.
    ///
    /// A record without channels attaches nothing and returns `Ok(None)`.
    /// Material channels require the node's first visual to carry a mesh
    /// material.
    pub fn bind(scene: &mut Scene, node: NodeHandle, record: &AnimationRecord) -> Result<Option<AnimatorKey>> {
        let target = scene.get_node(node).ok_or(PrismError::NodeNotFound(node))?;

        let interps = Self::interpolations(record);
        if interps.is_empty() {
            log::debug!("Animation without channels on node `{}`, nothing to bind", target.name);
            return Ok(None);
        }

        if target.mesh_material().is_none()
            && let Some(interp) = interps.iter().find(|i| i.target.is_material())
        {
            return Err(PrismError::MissingTarget {
                node,
                target: interp.target,
            });
        }

        let mut animator = KeyFrameAnimator::new(node, interps, record.duration, record.looping, record.easing);
        animator.start();
        scene
            .add_animator(animator)
            .map(Some)
            .ok_or(PrismError::NodeNotFound(node))
    }
}
