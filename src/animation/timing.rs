//! Time, iteration-count and timing-function parsing.
//!
//! All parsers are lenient: input they cannot read yields `None` (or the
//! default easing) and the caller falls back to [`AnimationDefaults`].
//!
//! [`AnimationDefaults`]: crate::settings::AnimationDefaults

use serde::{Deserialize, Serialize};

/// Easing applied to the normalized playback time of an animation.
///
/// Only two curves exist. Any timing function other than `linear`
/// (`ease`, `ease-in-out`, `cubic-bezier(...)`, `steps(...)`, typos)
/// degrades to [`Easing::QuadraticInOut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    QuadraticInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Parses a duration into milliseconds: `"500ms"` → 500, `"2s"` → 2000.
///
/// A value without a unit suffix, or one that is not finite, is rejected.
#[must_use]
pub fn parse_time(text: &str) -> Option<f32> {
    let text = text.trim();
    let ms = match text.strip_suffix("ms") {
        Some(ms) => ms.trim().parse::<f32>().ok(),
        None => text
            .strip_suffix('s')
            .and_then(|s| s.trim().parse::<f32>().ok())
            .map(|s| s * 1000.0),
    };
    ms.filter(|v| v.is_finite())
}

/// Parses a keyframe time: `"50%"` → 0.5, `"0.25"` → 0.25.
#[must_use]
pub fn parse_frame_time(text: &str) -> Option<f32> {
    let text = text.trim();
    let time = match text.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f32>().ok().map(|p| p / 100.0),
        None => text.parse::<f32>().ok(),
    };
    time.filter(|v| v.is_finite())
}

/// Parses a timing function name, case-insensitively.
#[must_use]
pub fn parse_timing_function(text: &str) -> Easing {
    if text.trim().eq_ignore_ascii_case("linear") {
        Easing::Linear
    } else {
        Easing::QuadraticInOut
    }
}

/// `"infinite"` loops forever; every other count plays once.
#[must_use]
pub fn parse_iteration_count(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("infinite")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_requires_a_unit() {
        assert_eq!(parse_time("2s"), Some(2000.0));
        assert_eq!(parse_time("500ms"), Some(500.0));
        assert_eq!(parse_time("1.5s"), Some(1500.0));
        assert_eq!(parse_time("250"), None);
        assert_eq!(parse_time("fast"), None);
    }

    #[test]
    fn quadratic_in_out_is_symmetric() {
        let e = Easing::QuadraticInOut;
        assert!((e.apply(0.25) - 0.125).abs() < 1e-6);
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((e.apply(0.75) - 0.875).abs() < 1e-6);
        assert!((e.apply(1.0) - 1.0).abs() < 1e-6);
    }
}
