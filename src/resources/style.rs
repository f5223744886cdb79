//! Material style parsing.
//!
//! Turns resolved style declarations into [`MaterialParams`], the
//! renderer-facing parameter set the material factory consumes. Every
//! field is optional and only set when its source key is present, except
//! `side`, which always defaults to double sided.

use serde::{Deserialize, Serialize};

use crate::markup::StyleMap;
use crate::resources::material::Side;
use crate::resources::texture::{CUBE_FACES, TextureRef, parse_url};
use crate::utils::color::parse_color_hex;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    pub map: Option<TextureRef>,
    pub env_map: Option<TextureRef>,
    /// Diffuse color as `0xRRGGBB`.
    pub color: Option<u32>,
    /// Specular color as `0xRRGGBB`.
    pub specular: Option<u32>,
    pub opacity: Option<f32>,
    pub transparent: Option<bool>,
    pub wireframe: Option<bool>,
    pub reflectivity: Option<f32>,
    pub refraction_ratio: Option<f32>,
    pub side: Side,
}

fn parse_float(style: &StyleMap, key: &str) -> Option<f32> {
    let value = style.get(key)?;
    match value.parse::<f32>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Invalid number `{value}` for `{key}`");
            None
        }
    }
}

fn parse_color(style: &StyleMap, key: &str) -> Option<u32> {
    let value = style.get(key)?;
    let hex = parse_color_hex(value);
    if hex.is_none() {
        log::warn!("Invalid color `{value}` for `{key}`");
    }
    hex
}

/// Resolves the environment map: six `envmap-<face>` declarations make a
/// cube map, otherwise a single `envmap` makes a spherical refraction map.
fn parse_env_map(style: &StyleMap) -> Option<TextureRef> {
    let faces: Vec<String> = CUBE_FACES
        .iter()
        .filter_map(|face| style.get(&format!("envmap-{face}")))
        .map(|value| parse_url(value).unwrap_or(value).to_string())
        .collect();

    if let Ok(urls) = <[String; 6]>::try_from(faces) {
        return Some(TextureRef::Cube { urls });
    }

    style.get("envmap").map(|value| TextureRef::SphericalRefraction {
        url: parse_url(value).unwrap_or(value).to_string(),
    })
}

/// Parses material declarations. Unrecognized keys are ignored.
///
/// `color-diffuse` sets the diffuse color; a plain `color` is accepted as
/// a fallback so that keyframe blocks written as `{ color: red }` animate
/// the diffuse color too.
#[must_use]
pub fn parse_material_style(style: &StyleMap) -> MaterialParams {
    let mut params = MaterialParams {
        map: style
            .get("image")
            .map(|value| TextureRef::image(parse_url(value).unwrap_or(value))),
        env_map: parse_env_map(style),
        color: parse_color(style, "color-diffuse").or_else(|| parse_color(style, "color")),
        specular: parse_color(style, "color-specular"),
        reflectivity: parse_float(style, "reflectivity"),
        refraction_ratio: parse_float(style, "refractionRatio"),
        ..Default::default()
    };

    if let Some(opacity) = parse_float(style, "opacity") {
        params.opacity = Some(opacity);
        params.transparent = Some(opacity < 1.0);
    }

    if let Some(visibility) = style.get("backface-visibility") {
        match visibility.to_ascii_lowercase().as_str() {
            "visible" => params.side = Side::Double,
            "hidden" => params.side = Side::Front,
            other => log::warn!("Unknown backface-visibility `{other}`"),
        }
    }

    if let Some(mode) = style.get("render-mode") {
        params.wireframe = Some(mode == "wireframe");
    }

    params
}
