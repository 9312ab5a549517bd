//! Concrete implementations of the trait abstractions.
//!
//! # Module structure
//! - `reqwest_http` - Production HTTP transport backed by reqwest
//! - `mock` - Test doubles with scripted responses

pub mod mock;
mod reqwest_http;

pub use reqwest_http::ReqwestHttpClient;
