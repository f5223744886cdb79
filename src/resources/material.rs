use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::resources::shader::ShaderMaterial;
use crate::resources::style::MaterialParams;
use crate::resources::texture::TextureRef;
use crate::utils::color::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
    #[default]
    Double,
}

/// Built-in lighting model of a [`MeshMaterial`], selected by the `shader`
/// style property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShaderKind {
    #[default]
    Basic,
    Phong,
    Lambert,
}

impl ShaderKind {
    /// Case-insensitive lookup. Unknown names fall back to `Basic`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "phong" => Self::Phong,
            "lambert" => Self::Lambert,
            "basic" => Self::Basic,
            other => {
                log::warn!("Unknown shader `{other}`, using basic");
                Self::Basic
            }
        }
    }
}

// MeshMaterial
// ----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshMaterial {
    pub kind: ShaderKind,
    pub color: Vec3,
    pub specular: Option<Vec3>,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub side: Side,
    pub map: Option<TextureRef>,
    pub env_map: Option<TextureRef>,
    pub reflectivity: Option<f32>,
    pub refraction_ratio: Option<f32>,
}

impl MeshMaterial {
    #[must_use]
    pub fn new(kind: ShaderKind) -> Self {
        Self {
            kind,
            color: Vec3::ONE,
            specular: None,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Double,
            map: None,
            env_map: None,
            reflectivity: None,
            refraction_ratio: None,
        }
    }

    #[must_use]
    pub fn from_params(kind: ShaderKind, params: &MaterialParams) -> Self {
        let mut material = Self::new(kind);
        if let Some(color) = params.color {
            material.color = Rgb::from_hex(color).to_vec3();
        }
        material.specular = params.specular.map(|hex| Rgb::from_hex(hex).to_vec3());
        if let Some(opacity) = params.opacity {
            material.opacity = opacity;
        }
        material.transparent = params.transparent.unwrap_or(false);
        material.wireframe = params.wireframe.unwrap_or(false);
        material.side = params.side;
        material.map.clone_from(&params.map);
        material.env_map.clone_from(&params.env_map);
        material.reflectivity = params.reflectivity;
        material.refraction_ratio = params.refraction_ratio;
        material
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color.to_vec3();
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}

impl Default for MeshMaterial {
    fn default() -> Self {
        Self::new(ShaderKind::Basic)
    }
}

// Material
// ----------------------------------------------------------------------------

/// A material attached to a visual. Custom shader materials are shared
/// between every visual that requested the same shader sources.
#[derive(Debug, Clone)]
pub enum Material {
    Mesh(MeshMaterial),
    Shader(Arc<ShaderMaterial>),
}

impl Material {
    #[must_use]
    pub fn as_mesh(&self) -> Option<&MeshMaterial> {
        match self {
            Self::Mesh(m) => Some(m),
            Self::Shader(_) => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshMaterial> {
        match self {
            Self::Mesh(m) => Some(m),
            Self::Shader(_) => None,
        }
    }

    #[must_use]
    pub fn as_shader(&self) -> Option<&Arc<ShaderMaterial>> {
        match self {
            Self::Shader(s) => Some(s),
            Self::Mesh(_) => None,
        }
    }
}

impl From<MeshMaterial> for Material {
    fn from(material: MeshMaterial) -> Self {
        Self::Mesh(material)
    }
}

impl From<Arc<ShaderMaterial>> for Material {
    fn from(material: Arc<ShaderMaterial>) -> Self {
        Self::Shader(material)
    }
}
