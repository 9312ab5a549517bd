//! HTTP transport trait abstraction.
//!
//! Provides a trait-based abstraction over the HTTP transport, enabling
//! dependency injection and mocking in tests. The streaming endpoints are
//! plain GETs whose response bodies arrive as chunked bytes.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// A chunked response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Buffered HTTP response for non-streaming calls.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

/// HTTP transport errors.
#[derive(Debug, Clone)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned an error status
    ServerError { status: u16, message: String },
    /// IO error while reading the body
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for the HTTP transport.
///
/// Implementations include the production reqwest-based client and a mock
/// client for tests. The trait is deliberately small: the news backend only
/// needs buffered GETs (health check) and streaming GETs (the two event
/// stream endpoints).
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and buffer the full response.
    async fn get(&self, url: &str) -> Result<Response, HttpError>;

    /// Perform a GET request and return the response body as a stream of
    /// byte chunks. A non-success status is reported as an error before
    /// any chunk is yielded.
    async fn get_stream(&self, url: &str) -> Result<ByteStream, HttpError>;
}
