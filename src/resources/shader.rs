//! Custom shader materials and their uniforms.

use rustc_hash::FxHashMap;

use crate::resources::texture::TextureRef;

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// Type `f`.
    Float(f32),
    /// Type `t`: bound to the material's environment map, if any.
    Texture(Option<TextureRef>),
    /// Any other type tag, kept verbatim for the renderer.
    Raw { kind: String, value: String },
}

pub type Uniforms = FxHashMap<String, UniformValue>;

/// A compiled custom shader material: vertex and fragment source text plus
/// its uniforms.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderMaterial {
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub uniforms: Uniforms,
}

impl ShaderMaterial {
    #[must_use]
    pub fn new(vertex_shader: String, fragment_shader: String, uniforms: Uniforms) -> Self {
        Self {
            vertex_shader,
            fragment_shader,
            uniforms,
        }
    }
}

/// Parses a `shader-uniforms` value: whitespace separated `name type value`
/// triples. A trailing incomplete triple is ignored.
///
/// `t` uniforms do not name a texture; they always receive `env_map`.
#[must_use]
pub fn parse_uniforms(text: &str, env_map: Option<&TextureRef>) -> Uniforms {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut uniforms = Uniforms::default();

    for triple in tokens.chunks_exact(3) {
        let &[name, kind, value] = triple else {
            continue;
        };
        let uniform = match kind {
            "f" => match value.parse::<f32>() {
                Ok(v) => UniformValue::Float(v),
                Err(_) => {
                    log::warn!("Invalid float `{value}` for uniform `{name}`");
                    continue;
                }
            },
            "t" => UniformValue::Texture(env_map.cloned()),
            _ => UniformValue::Raw {
                kind: kind.to_string(),
                value: value.to_string(),
            },
        };
        uniforms.insert(name.to_string(), uniform);
    }

    if tokens.len() % 3 != 0 {
        log::warn!("Ignoring incomplete uniform declaration in `{text}`");
    }

    uniforms
}
