//! Error Types
//!
//! This module defines the error types used throughout the compiler.
//!
//! # Overview
//!
//! The main error type [`PrismError`] covers the failure modes that are
//! surfaced to callers:
//! - Binding failures (an animation channel without a target on the node)
//! - Shader source fetch errors
//! - Cancelled asynchronous requests
//!
//! Parsing problems (bad durations, unknown timing functions, unknown
//! keyframe properties) are not errors: they degrade to defaults and are
//! reported through the `log` facade.
//!
//! # Usage
//!
//! ```rust,ignore
//! use prism::errors::{PrismError, Result};
//!
//! fn bind_all() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::animation::TargetPath;
use crate::scene::NodeHandle;

/// The main error type for the Prism compiler.
#[derive(Error, Debug)]
pub enum PrismError {
    // ========================================================================
    // Binding Errors
    // ========================================================================
    /// The node handle does not refer to a live node in the scene.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// An animation channel needs a sub-object the node does not have,
    /// e.g. an opacity track on a node without a mesh material.
    #[error("Missing animation target {target:?} on node {node:?}")]
    MissingTarget {
        /// The node being bound
        node: NodeHandle,
        /// The property the channel wanted to drive
        target: TargetPath,
    },

    // ========================================================================
    // Fetch Errors
    // ========================================================================
    /// Fetching shader source text failed.
    #[error("Failed to fetch {url}: {message}")]
    Fetch {
        /// The requested URL
        url: String,
        /// Transport or status description
        message: String,
    },

    /// HTTP response error with status code.
    #[error("HTTP response error for {url}: status {status}")]
    HttpResponse {
        /// The requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// URL parsing error.
    #[cfg(feature = "http")]
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    // ========================================================================
    // Async Errors
    // ========================================================================
    /// A pending request was cancelled before it resolved.
    #[error("Request cancelled: {0}")]
    Cancelled(String),
}

/// Alias for `Result<T, PrismError>`.
pub type Result<T> = std::result::Result<T, PrismError>;
