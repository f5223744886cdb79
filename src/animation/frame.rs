//! Keyframe records.

use serde::{Deserialize, Serialize};

use crate::animation::timing::parse_frame_time;
use crate::markup::{Element, StyleMap, TransformComponents, parse_transform};
use crate::resources::style::{MaterialParams, parse_material_style};
use crate::settings::AnimationDefaults;

/// The property a keyframe drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameProperty {
    Transform,
    Material,
}

impl FrameProperty {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "transform" => Some(Self::Transform),
            "material" => Some(Self::Material),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameKind {
    Transform(TransformComponents),
    Material(MaterialParams),
}

/// One normalized keyframe: a time and the values it sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub time: f32,
    pub kind: FrameKind,
}

impl Frame {
    #[must_use]
    pub fn transform(time: f32, components: TransformComponents) -> Self {
        Self {
            time,
            kind: FrameKind::Transform(components),
        }
    }

    #[must_use]
    pub fn material(time: f32, params: MaterialParams) -> Self {
        Self {
            time,
            kind: FrameKind::Material(params),
        }
    }

    /// Parses the frame value for `property`.
    #[must_use]
    pub fn from_value(time: f32, property: FrameProperty, value: &str) -> Self {
        match property {
            FrameProperty::Transform => Self::transform(time, parse_transform(value)),
            FrameProperty::Material => {
                let style = StyleMap::parse_declarations(value);
                Self::material(time, parse_material_style(&style))
            }
        }
    }
}

/// Reads a `time` as a frame time, falling back to `defaults.frame_time`.
pub(crate) fn frame_time_or_default(text: Option<&str>, defaults: &AnimationDefaults) -> f32 {
    if let Some(text) = text {
        if let Some(time) = parse_frame_time(text) {
            return time;
        }
        log::warn!("Invalid keyframe time `{text}`, using `{}`", defaults.frame_time);
    }
    parse_frame_time(&defaults.frame_time).unwrap_or(0.0)
}

/// Parses a `<keyframe time=".." property=".." value="..">` element.
///
/// Returns `None`, with a warning, when the property is neither
/// `transform` nor `material`.
#[must_use]
pub fn parse_frame(element: &Element, defaults: &AnimationDefaults) -> Option<Frame> {
    let time = frame_time_or_default(element.attribute("time"), defaults);
    let property_name = element.attribute_or("property", &defaults.frame_property);
    let Some(property) = FrameProperty::from_name(property_name) else {
        log::warn!("Dropping keyframe with unknown property `{property_name}`");
        return None;
    };
    let value = element.attribute("value").unwrap_or_default();

    Some(Frame::from_value(time, property, value))
}
