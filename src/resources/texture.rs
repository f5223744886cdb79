//! Texture references.
//!
//! Textures are not decoded here. Materials carry references that a
//! renderer resolves when it uploads the scene.

use serde::{Deserialize, Serialize};

/// Face order of a cube map: right, left, top, bottom, front, back.
pub const CUBE_FACES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureRef {
    /// A 2D image texture with default UV mapping.
    Image { url: String },
    /// Six images in [`CUBE_FACES`] order.
    Cube { urls: [String; 6] },
    /// A single image used as a spherical refraction environment map.
    SphericalRefraction { url: String },
}

impl TextureRef {
    #[must_use]
    pub fn image(url: &str) -> Self {
        Self::Image { url: url.to_string() }
    }
}

/// Extracts the location from a `url(...)` wrapper, dropping optional
/// quotes. Returns `None` when the value has no parenthesized part.
#[must_use]
pub fn parse_url(value: &str) -> Option<&str> {
    let open = value.find('(')?;
    let close = open + 1 + value[open + 1..].find(')')?;
    let inner = value[open + 1..close]
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    if inner.is_empty() { None } else { Some(inner) }
}
