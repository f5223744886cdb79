//! Animation parsing from markup.
//!
//! Two sources produce an [`AnimationRecord`]:
//! - an `<animation>` element with `<keyframe>` children
//! - an element style naming a `@keyframes` block, either through the
//!   `animation-*` longhands or the `animation` shorthand

use crate::animation::frame::{Frame, frame_time_or_default, parse_frame};
use crate::animation::record::AnimationRecord;
use crate::animation::timing::{Easing, parse_iteration_count, parse_time, parse_timing_function};
use crate::markup::{Element, Keyframes, StyleMap, StyleSheet, parse_transform};
use crate::resources::style::parse_material_style;
use crate::settings::AnimationDefaults;

const PREFIXES: [&str; 3] = ["", "-webkit-", "-moz-"];

/// Looks up `name` and its vendor prefixed variants, in that order.
fn prefixed<'a>(style: &'a StyleMap, name: &str) -> Option<&'a str> {
    PREFIXES
        .iter()
        .find_map(|prefix| style.get(&format!("{prefix}{name}")))
}

fn duration_or_default(text: Option<&str>, defaults: &AnimationDefaults) -> f32 {
    if let Some(text) = text {
        if let Some(ms) = parse_time(text) {
            return ms;
        }
        log::warn!("Invalid duration `{text}`, using `{}`", defaults.duration);
    }
    parse_time(&defaults.duration).unwrap_or(0.0)
}

/// Playback parameters of an animation, still in textual form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleAnimation {
    pub name: Option<String>,
    pub duration: Option<String>,
    pub timing_function: Option<String>,
    /// Parsed but not applied: playback starts as soon as the animation is
    /// bound.
    pub delay: Option<String>,
    pub iteration_count: Option<String>,
}

impl StyleAnimation {
    /// Reads the longhand properties, or the shorthand when no
    /// `animation-name` is set.
    ///
    /// The shorthand is positional:
    /// `name duration timing-function delay iteration-count`.
    #[must_use]
    pub fn from_style(style: &StyleMap) -> Self {
        let owned = |v: Option<&str>| v.map(str::to_string);

        if let Some(name) = prefixed(style, "animation-name") {
            return Self {
                name: Some(name.to_string()),
                duration: owned(prefixed(style, "animation-duration")),
                timing_function: owned(prefixed(style, "animation-timing-function")),
                delay: owned(prefixed(style, "animation-delay")),
                iteration_count: owned(prefixed(style, "animation-iteration-count")),
            };
        }

        let Some(shorthand) = prefixed(style, "animation") else {
            return Self::default();
        };
        let mut parts = shorthand.split_whitespace().map(str::to_string);
        Self {
            name: parts.next(),
            duration: parts.next(),
            timing_function: parts.next(),
            delay: parts.next(),
            iteration_count: parts.next(),
        }
    }

    /// Resolves `(duration_ms, looping, easing)`, filling gaps from
    /// `defaults`.
    #[must_use]
    pub fn playback(&self, defaults: &AnimationDefaults) -> (f32, bool, Easing) {
        let duration = duration_or_default(self.duration.as_deref(), defaults);
        let easing = parse_timing_function(
            self.timing_function
                .as_deref()
                .unwrap_or(&defaults.timing_function),
        );
        let looping = parse_iteration_count(
            self.iteration_count
                .as_deref()
                .unwrap_or(&defaults.iteration_count),
        );
        (duration, looping, easing)
    }
}

/// Parses an `<animation>` element. Children other than `<keyframe>` are
/// skipped, as are keyframes with an unknown property.
#[must_use]
pub fn parse_animation_element(element: &Element, defaults: &AnimationDefaults) -> AnimationRecord {
    let duration = duration_or_default(element.attribute("duration"), defaults);
    let looping = parse_iteration_count(element.attribute_or("iteration-count", &defaults.iteration_count));
    let easing = parse_timing_function(element.attribute_or("timing-function", &defaults.timing_function));

    let frames: Vec<Frame> = element
        .children()
        .iter()
        .filter(|child| child.tag_name() == "keyframe")
        .filter_map(|child| parse_frame(child, defaults))
        .collect();

    AnimationRecord::build(duration, looping, easing, &frames)
}

/// Turns `@keyframes` blocks into frames.
///
/// `from` is time 0, `to` is time 1, anything else is a frame time. Each
/// block yields a transform frame for its `transform` declaration and a
/// single material frame when it declares `opacity` or a color.
#[must_use]
pub fn keyframes_to_frames(keyframes: &Keyframes, defaults: &AnimationDefaults) -> Vec<Frame> {
    let mut frames = Vec::new();

    for (selector, block) in keyframes.iter() {
        let time = match selector.to_ascii_lowercase().as_str() {
            "from" => 0.0,
            "to" => 1.0,
            _ => frame_time_or_default(Some(selector), defaults),
        };

        if let Some(transform) = prefixed(block, "transform") {
            frames.push(Frame::transform(time, parse_transform(transform)));
        }

        if ["opacity", "color", "color-diffuse"].iter().any(|k| block.contains(k)) {
            frames.push(Frame::material(time, parse_material_style(block)));
        }
    }

    frames
}

/// Parses the animation an element's resolved style refers to.
///
/// Returns `None` when the style names no animation or the named
/// `@keyframes` block does not exist.
#[must_use]
pub fn parse_animation_style(
    style: &StyleMap,
    sheet: &StyleSheet,
    defaults: &AnimationDefaults,
) -> Option<AnimationRecord> {
    let anim = StyleAnimation::from_style(style);
    let name = anim.name.as_deref()?;

    let Some(keyframes) = sheet.keyframes(name) else {
        log::warn!("No @keyframes named `{name}`");
        return None;
    };

    let (duration, looping, easing) = anim.playback(defaults);
    let frames = keyframes_to_frames(keyframes, defaults);
    Some(AnimationRecord::build(duration, looping, easing, &frames))
}
