//! Newswire - streaming client for the news aggregation backend
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod stream;
pub mod traits;
