//! Trait abstractions for dependency injection.
//!
//! # Module structure
//! - `http` - HTTP transport trait, response and error types

mod http;

pub use http::{ByteStream, HttpClient, HttpError, Response};
