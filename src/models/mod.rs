//! Domain model types shared across the client.
//!
//! # Module structure
//! - `article` - Passthrough article record
//! - `params` - Request parameters for the two streaming endpoints
//! - `source` - Per-source result and status types

mod article;
mod params;
mod source;

pub use article::Article;
pub use params::{
    SearchParams, SessionParams, SortMode, SourceSelection, StreamKind, TrendingParams,
};
pub use source::{SourceResult, SourceStatus};
