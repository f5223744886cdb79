#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Compiles declarative scene markup into animated scene graphs.
//!
//! Elements, styles and `@keyframes` blocks are parsed into immutable
//! [`AnimationRecord`]s and renderer independent [`Material`]s, then bound
//! to the nodes of a [`Scene`]. [`Document`] ties the pieces together for
//! one markup tree.

pub mod animation;
pub mod assets;
pub mod document;
pub mod errors;
pub mod markup;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod utils;

pub use animation::{
    AnimationRecord, AnimationRegistry, AnimationSystem, Binder, Easing, Frame, FrameKind, KeyFrameAnimator,
    TargetPath,
};
#[cfg(feature = "http")]
pub use assets::HttpSourceFetcher;
pub use assets::{MaterialFactory, MaterialOutcome, ShaderCache, ShaderKey, SourceFetcher};
pub use document::{Document, MaterialReady};
pub use errors::{PrismError, Result};
pub use markup::{Element, StyleMap, StyleSheet};
pub use resources::{Material, MaterialParams, MeshMaterial, ShaderKind, ShaderMaterial, Side, TextureRef};
pub use scene::{Node, NodeHandle, Scene, Transform};
pub use settings::{AnimationDefaults, DocumentSettings};
