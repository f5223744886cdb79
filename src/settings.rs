//! Document Settings
//!
//! Configuration for a [`Document`](crate::document::Document): the textual
//! defaults used when markup omits animation attributes, and the base URL
//! shader sources are resolved against.
//!
//! ```rust,ignore
//! use prism::settings::{AnimationDefaults, DocumentSettings};
//!
//! let settings = DocumentSettings {
//!     base_url: Some("https://example.com/scenes/".into()),
//!     animation: AnimationDefaults {
//!         duration: "500ms".into(),
//!         ..Default::default()
//!     },
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Textual defaults applied when an animation attribute or style property
/// is missing. They go through the same parsers as markup values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnimationDefaults {
    pub duration: String,
    pub iteration_count: String,
    pub timing_function: String,
    pub frame_time: String,
    pub frame_property: String,
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        Self {
            duration: "1s".into(),
            iteration_count: "1".into(),
            timing_function: "linear".into(),
            frame_time: "0%".into(),
            frame_property: "transform".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DocumentSettings {
    pub animation: AnimationDefaults,
    /// Base URL relative shader URLs are joined to. `None` means URLs must
    /// be absolute.
    pub base_url: Option<String>,
}
