//! Mock adapters for testing without network access.

mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
