//! Animation parsing, building and playback.
//!
//! Markup is parsed into [`Frame`]s, frames are built into an immutable
//! [`AnimationRecord`], records are stored in an [`AnimationRegistry`] and
//! bound to scene nodes by the [`Binder`], which attaches a started
//! [`KeyFrameAnimator`]. [`AnimationSystem`] advances the animators.

pub mod animator;
pub mod binder;
pub mod binding;
pub mod frame;
pub mod parser;
pub mod record;
pub mod registry;
pub mod system;
pub mod timing;
pub mod tracks;
pub mod values;

pub use animator::KeyFrameAnimator;
pub use binder::Binder;
pub use binding::{Interpolation, TargetPath, TrackData};
pub use frame::{Frame, FrameKind, FrameProperty, parse_frame};
pub use parser::{StyleAnimation, keyframes_to_frames, parse_animation_element, parse_animation_style};
pub use record::{AnimationRecord, Channels};
pub use registry::{AnimationRegistry, AvailableCallback};
pub use system::AnimationSystem;
pub use timing::{Easing, parse_frame_time, parse_iteration_count, parse_time, parse_timing_function};
pub use tracks::{KeyframeCursor, KeyframeTrack};
pub use values::{AxisValues, Interpolatable};
