use glam::{Affine3A, EulerRot, Quat, Vec3};

use crate::markup::TransformComponents;

/// Position, rotation and scale of a node, with a cached local matrix.
///
/// The cache is refreshed lazily: [`update_local_matrix`](Self::update_local_matrix)
/// compares the public fields with the values used for the last rebuild.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,

    /// Euler angles last written through `set_rotation_euler`, valid while
    /// `rotation == euler_rotation`.
    euler: Vec3,
    euler_rotation: Quat,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,

            euler: Vec3::ZERO,
            euler_rotation: Quat::IDENTITY,
        }
    }

    /// Rebuilds the local matrix if anything changed. Returns whether it
    /// was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);
            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// Euler XYZ, radians. The angles are kept as given, so reading them
    /// back does not wrap `y` past `±π/2`.
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self.euler = Vec3::new(x, y, z);
        self.euler_rotation = self.rotation;
    }

    /// The angles last set with [`set_rotation_euler`](Self::set_rotation_euler),
    /// or a decomposition of `rotation` if it was assigned directly since.
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        if self.rotation == self.euler_rotation {
            return self.euler;
        }
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Overwrites the components present in `t`. Rotation components
    /// replace the matching Euler angles of the current rotation.
    pub fn apply_components(&mut self, t: &TransformComponents) {
        let p = self.position;
        self.position = Vec3::new(t.x.unwrap_or(p.x), t.y.unwrap_or(p.y), t.z.unwrap_or(p.z));

        if t.has_rotation() {
            let r = self.rotation_euler();
            self.set_rotation_euler(t.rx.unwrap_or(r.x), t.ry.unwrap_or(r.y), t.rz.unwrap_or(r.z));
        }

        let s = self.scale;
        self.scale = Vec3::new(t.sx.unwrap_or(s.x), t.sy.unwrap_or(s.y), t.sz.unwrap_or(s.z));
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
