use crate::scene::Scene;

/// Drives every animator in a scene.
pub struct AnimationSystem;

impl AnimationSystem {
    /// Advances all running animators by `dt` milliseconds.
    ///
    /// Animators whose node has been removed are skipped.
    pub fn update(scene: &mut Scene, dt: f32) {
        let Scene { nodes, animators, .. } = scene;

        for (_key, animator) in animators.iter_mut() {
            if !animator.is_running() {
                continue;
            }
            if let Some(node) = nodes.get_mut(animator.node()) {
                animator.update(dt, node);
            }
        }
    }
}
