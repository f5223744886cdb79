use glam::Affine3A;

use crate::resources::material::{Material, MeshMaterial};
use crate::scene::transform::Transform;
use crate::scene::{AnimatorKey, NodeHandle};

/// A renderable part of a node. Only the material is modeled.
#[derive(Debug, Clone, Default)]
pub struct Visual {
    pub material: Option<Material>,
}

impl Visual {
    #[must_use]
    pub fn new(material: Material) -> Self {
        Self {
            material: Some(material),
        }
    }
}

/// A scene node.
///
/// Material animation channels target `visuals[0].material`, which must be
/// a [`MeshMaterial`].
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub visuals: Vec<Visual>,
    /// Animators attached to this node, stored in [`Scene::animators`].
    ///
    /// [`Scene::animators`]: crate::scene::Scene::animators
    pub animators: Vec<AnimatorKey>,

    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visuals: Vec::new(),
            animators: Vec::new(),
            visible: true,
        }
    }

    #[must_use]
    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visuals.push(visual);
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// The material of the first visual, if it is a mesh material.
    #[must_use]
    pub fn mesh_material(&self) -> Option<&MeshMaterial> {
        self.visuals.first()?.material.as_ref()?.as_mesh()
    }

    pub fn mesh_material_mut(&mut self) -> Option<&mut MeshMaterial> {
        self.visuals.first_mut()?.material.as_mut()?.as_mesh_mut()
    }

    /// Replaces the material of the first visual, creating the visual if
    /// the node has none.
    pub fn set_material(&mut self, material: Material) {
        match self.visuals.first_mut() {
            Some(visual) => visual.material = Some(material),
            None => self.visuals.push(Visual::new(material)),
        }
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
