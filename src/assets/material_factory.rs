use std::sync::Arc;

use crate::assets::io::SourceFetcher;
use crate::assets::shader_cache::{ShaderCache, ShaderCallback, ShaderKey};
use crate::markup::{Element, StyleMap};
use crate::resources::material::{Material, MeshMaterial, ShaderKind};
use crate::resources::shader::{ShaderMaterial, Uniforms, parse_uniforms};
use crate::resources::style::{MaterialParams, parse_material_style};
use crate::resources::texture::parse_url;

/// Resolves inline shader sources by element id.
pub trait ShaderSourceLookup {
    fn shader_source(&self, id: &str) -> Option<&str>;
}

impl ShaderSourceLookup for Element {
    fn shader_source(&self, id: &str) -> Option<&str> {
        self.find_by_id(id)
            .map(Element::text)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Result of [`MaterialFactory::create`].
#[derive(Debug, Clone)]
pub enum MaterialOutcome {
    Ready(Material),
    /// Shader sources are being fetched; the callback will receive the
    /// material.
    Pending,
    /// Inline shader sources could not be found.
    Unavailable,
}

impl MaterialOutcome {
    #[must_use]
    pub fn into_material(self) -> Option<Material> {
        match self {
            Self::Ready(material) => Some(material),
            Self::Pending | Self::Unavailable => None,
        }
    }
}

/// Builds materials from resolved element styles.
#[derive(Clone)]
pub struct MaterialFactory {
    shader_cache: ShaderCache,
}

impl MaterialFactory {
    #[must_use]
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            shader_cache: ShaderCache::new(fetcher),
        }
    }

    #[must_use]
    pub fn shader_cache(&self) -> &ShaderCache {
        &self.shader_cache
    }

    /// Creates the material described by `style`.
    ///
    /// - `shader: phong | lambert | basic` selects a built-in material.
    /// - `shader-vertex`, `shader-fragment` and `shader-uniforms` together
    ///   select a custom shader. `url(...)` sources are fetched through the
    ///   shader cache and `on_ready` is called once both arrive; other values
    ///   are element ids looked up in `sources`.
    /// - Anything else, including no style at all, is a basic material.
    pub fn create(
        &self,
        style: Option<&StyleMap>,
        sources: &dyn ShaderSourceLookup,
        on_ready: ShaderCallback,
    ) -> MaterialOutcome {
        let Some(style) = style else {
            return MaterialOutcome::Ready(MeshMaterial::default().into());
        };
        let params = parse_material_style(style);

        if let Some(shader) = style.get("shader") {
            let kind = ShaderKind::from_name(shader);
            return MaterialOutcome::Ready(MeshMaterial::from_params(kind, &params).into());
        }

        if let (Some(vs), Some(fs), Some(uniforms)) = (
            style.get("shader-vertex"),
            style.get("shader-fragment"),
            style.get("shader-uniforms"),
        ) {
            return self.create_shader_material(vs, fs, uniforms, &params, sources, on_ready);
        }

        MaterialOutcome::Ready(MeshMaterial::from_params(ShaderKind::Basic, &params).into())
    }

    fn create_shader_material(
        &self,
        vs: &str,
        fs: &str,
        uniforms: &str,
        params: &MaterialParams,
        sources: &dyn ShaderSourceLookup,
        on_ready: ShaderCallback,
    ) -> MaterialOutcome {
        let uniforms: Uniforms = parse_uniforms(uniforms, params.env_map.as_ref());

        let (Some(vs_url), Some(fs_url)) = (parse_url(vs), parse_url(fs)) else {
            return match (sources.shader_source(vs), sources.shader_source(fs)) {
                (Some(vertex), Some(fragment)) => {
                    let material = ShaderMaterial::new(vertex.to_string(), fragment.to_string(), uniforms);
                    MaterialOutcome::Ready(Material::Shader(Arc::new(material)))
                }
                _ => {
                    log::warn!("Shader source `{vs}` / `{fs}` not found in the document");
                    MaterialOutcome::Unavailable
                }
            };
        };

        let key = ShaderKey::new(vs_url, fs_url);
        match self.shader_cache.request(key, uniforms, on_ready) {
            Some(material) => MaterialOutcome::Ready(Material::Shader(material)),
            None => MaterialOutcome::Pending,
        }
    }
}
