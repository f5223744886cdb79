//! Material assets.
//!
//! - [`SourceFetcher`]: text fetching (HTTP through `ehttp` with the `http`
//!   feature)
//! - [`ShaderCache`]: compiled shader materials keyed by source URLs
//! - [`MaterialFactory`]: materials from resolved styles

pub mod io;
pub mod material_factory;
pub mod shader_cache;

#[cfg(feature = "http")]
pub use io::HttpSourceFetcher;
pub use io::{FetchCallback, SourceFetcher};
pub use material_factory::{MaterialFactory, MaterialOutcome, ShaderSourceLookup};
pub use shader_cache::{ShaderCache, ShaderCallback, ShaderKey};
