//! Scene graph.
//!
//! - [`Node`]: hierarchy, transform, visuals and attached animators
//! - [`Transform`]: position, rotation and scale with matrix caching
//! - [`Scene`]: node and animator storage

pub mod node;
pub mod scene;
pub mod transform;

pub use node::{Node, Visual};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct AnimatorKey;
}
