//! Material resources.
//!
//! Renderer-independent material descriptions produced by the compiler:
//! - [`MaterialParams`]: parameters parsed from style declarations
//! - [`MeshMaterial`]: basic / phong / lambert materials
//! - [`ShaderMaterial`]: custom shader materials with uniforms
//! - [`TextureRef`]: unresolved texture references

pub mod material;
pub mod shader;
pub mod style;
pub mod texture;

pub use material::{Material, MeshMaterial, ShaderKind, Side};
pub use shader::{ShaderMaterial, UniformValue, Uniforms, parse_uniforms};
pub use style::{MaterialParams, parse_material_style};
pub use texture::{TextureRef, parse_url};
