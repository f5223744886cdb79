use glam::Affine3A;
use slotmap::SlotMap;

use crate::animation::animator::KeyFrameAnimator;
use crate::scene::node::Node;
use crate::scene::{AnimatorKey, NodeHandle};

/// Scene graph storage.
///
/// Nodes live in a slot map addressed by [`NodeHandle`]. Animators are a
/// component pool: each one records the node it drives, and the node keeps
/// the keys of the animators attached to it.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
    pub animators: SlotMap<AnimatorKey, KeyFrameAnimator>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node at the root of the scene.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node under `parent`. Falls back to the root if `parent` is
    /// not in the scene.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node {parent:?} not found, adding `{}` at the root", child.name);
            return self.add_node(child);
        }

        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// First node with the given name, in insertion order.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(handle, _)| handle)
    }

    /// Attaches an animator to a node. Returns `None` if the node is gone.
    pub fn add_animator(&mut self, animator: KeyFrameAnimator) -> Option<AnimatorKey> {
        let node = animator.node();
        if !self.nodes.contains_key(node) {
            return None;
        }
        let key = self.animators.insert(animator);
        if let Some(n) = self.nodes.get_mut(node) {
            n.animators.push(key);
        }
        Some(key)
    }

    #[must_use]
    pub fn animator(&self, key: AnimatorKey) -> Option<&KeyFrameAnimator> {
        self.animators.get(key)
    }

    pub fn animator_mut(&mut self, key: AnimatorKey) -> Option<&mut KeyFrameAnimator> {
        self.animators.get_mut(key)
    }

    /// Animators attached to `node`.
    pub fn animators_of(&self, node: NodeHandle) -> impl Iterator<Item = &KeyFrameAnimator> {
        self.nodes
            .get(node)
            .map(|n| n.animators.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&key| self.animators.get(key))
    }

    /// Updates world matrices for the whole hierarchy.
    ///
    /// Iterative depth-first walk; a subtree is only recomputed when a
    /// local matrix on its path changed.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);
        for &root in self.root_nodes.iter().rev() {
            stack.push((root, Affine3A::IDENTITY, false));
        }

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };

            let local_changed = node.transform.update_local_matrix();
            let world_changed = local_changed || parent_changed;
            if world_changed {
                let world = parent_world * *node.transform.local_matrix();
                node.transform.set_world_matrix(world);
            }

            let world = *node.transform.world_matrix();
            for &child in node.children.iter().rev() {
                stack.push((child, world, world_changed));
            }
        }
    }
}
