//! News backend API client.
//!
//! This module provides the HTTP client for the aggregation backend's two
//! streaming endpoints (trending and search). Both return a long-lived
//! chunked body that is decoded incrementally into [`StreamMessage`]s; a
//! malformed line is logged and skipped rather than ending the stream.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use tracing::warn;

use crate::adapters::ReqwestHttpClient;
use crate::error::ClientError;
use crate::models::{SearchParams, SessionParams, TrendingParams};
use crate::stream::{EventParser, LineOutcome, StreamMessage};
use crate::traits::{ByteStream, HttpClient, HttpError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// A decoded message stream from one of the streaming endpoints.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<StreamMessage, ClientError>> + Send>>;

/// Client for the streaming news aggregation backend.
pub struct NewsClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl NewsClient {
    /// Create a client for the given base URL using the production
    /// reqwest transport.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, Arc::new(ReqwestHttpClient::new()))
    }

    /// Create a client with a custom transport (used by tests).
    pub fn with_http(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for the trending stream endpoint.
    pub fn trending_url(&self, params: &TrendingParams) -> String {
        format!(
            "{}/api/news/trending/stream?category={}&limit={}&sources={}",
            self.base_url,
            urlencoding::encode(&params.category),
            params.limit,
            urlencoding::encode(&params.sources.to_query_value()),
        )
    }

    /// URL for the search stream endpoint.
    pub fn search_url(&self, params: &SearchParams) -> String {
        format!(
            "{}/api/news/search/stream?query={}&page={}&per_site_limit={}&sources={}&sort={}",
            self.base_url,
            urlencoding::encode(&params.query),
            params.page,
            params.per_site_limit,
            urlencoding::encode(&params.sources.to_query_value()),
            params.sort.as_str(),
        )
    }

    /// Open a trending stream.
    pub async fn trending_stream(
        &self,
        params: &TrendingParams,
    ) -> Result<MessageStream, ClientError> {
        self.open_stream(self.trending_url(params)).await
    }

    /// Open a search stream.
    pub async fn search_stream(&self, params: &SearchParams) -> Result<MessageStream, ClientError> {
        if params.query.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "search query must not be empty".to_string(),
            ));
        }
        self.open_stream(self.search_url(params)).await
    }

    /// Open the stream matching the given session parameters.
    pub async fn open_session_stream(
        &self,
        params: &SessionParams,
    ) -> Result<MessageStream, ClientError> {
        match params {
            SessionParams::Trending(p) => self.trending_stream(p).await,
            SessionParams::Search(p) => self.search_stream(p).await,
        }
    }

    /// Check whether the backend is reachable and healthy.
    pub async fn health_check(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url).await?;
        Ok(response.is_success())
    }

    async fn open_stream(&self, url: String) -> Result<MessageStream, ClientError> {
        let bytes_stream = self.http.get_stream(&url).await.map_err(|e| match e {
            HttpError::ServerError { status, message } => ClientError::Server { status, message },
            other => ClientError::Transport(other),
        })?;
        Ok(decode_stream(bytes_stream))
    }
}

/// Turn a raw byte stream into a stream of parsed messages.
///
/// Chunk boundaries may fall anywhere; the [`EventParser`] reassembles
/// characters and lines. Malformed payloads and unknown message types are
/// logged and skipped here so the consumer only sees well-formed messages
/// and transport errors.
fn decode_stream(bytes_stream: ByteStream) -> MessageStream {
    struct DecodeState {
        bytes_stream: ByteStream,
        parser: EventParser,
        ready: std::collections::VecDeque<StreamMessage>,
        done: bool,
    }

    let state = DecodeState {
        bytes_stream,
        parser: EventParser::new(),
        ready: std::collections::VecDeque::new(),
        done: false,
    };

    let message_stream = stream::unfold(state, |mut st| async move {
        loop {
            if let Some(message) = st.ready.pop_front() {
                return Some((Ok(message), st));
            }
            if st.done {
                return None;
            }

            match st.bytes_stream.next().await {
                Some(Ok(chunk)) => {
                    for outcome in st.parser.feed(&chunk) {
                        enqueue(outcome, &mut st.ready);
                    }
                }
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(ClientError::Transport(e)), st));
                }
                None => {
                    st.done = true;
                    for outcome in st.parser.finish() {
                        enqueue(outcome, &mut st.ready);
                    }
                }
            }
        }
    });

    Box::pin(message_stream)
}

fn enqueue(outcome: LineOutcome, ready: &mut std::collections::VecDeque<StreamMessage>) {
    match outcome {
        LineOutcome::Message(message) => ready.push_back(message),
        LineOutcome::Malformed { error, line } => {
            warn!(%error, line = %line, "skipping malformed stream line");
        }
        LineOutcome::UnknownType { message_type } => {
            warn!(%message_type, "ignoring unknown stream message type");
        }
        LineOutcome::Ignored => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::models::{SortMode, SourceSelection};
    use bytes::Bytes;

    fn mock_client(mock: MockHttpClient) -> NewsClient {
        NewsClient::with_http("http://test", Arc::new(mock))
    }

    #[test]
    fn test_trending_url() {
        let client = NewsClient::new("http://localhost:8000/");
        let params = TrendingParams::new("sports")
            .with_limit(3)
            .with_sources(SourceSelection::parse("bbc,scmp"));
        assert_eq!(
            client.trending_url(&params),
            "http://localhost:8000/api/news/trending/stream?category=sports&limit=3&sources=bbc%2Cscmp"
        );
    }

    #[test]
    fn test_search_url_encodes_query() {
        let client = NewsClient::new(DEFAULT_BASE_URL);
        let params = SearchParams::new("서울 news").with_sort(SortMode::Relevance);
        let url = client.search_url(&params);
        assert!(url.contains("query=%EC%84%9C%EC%9A%B8%20news"));
        assert!(url.contains("sort=relevance"));
        assert!(url.contains("page=1"));
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let client = mock_client(MockHttpClient::new());
        let result = client.search_stream(&SearchParams::new("  ")).await;
        assert!(matches!(result, Err(ClientError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stream_decodes_messages() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/api/news/trending/stream",
            MockResponse::Stream(vec![
                Bytes::from("data: {\"type\":\"start\",\"category\":\"all\"}\n\n"),
                Bytes::from("data: {\"type\":\"complete\",\"total_completed\":0}\n\n"),
            ]),
        );
        let client = mock_client(mock);

        let mut stream = client
            .trending_stream(&TrendingParams::default())
            .await
            .unwrap();

        let mut names = Vec::new();
        while let Some(item) = stream.next().await {
            names.push(item.unwrap().type_name());
        }
        assert_eq!(names, vec!["start", "complete"]);
    }

    #[tokio::test]
    async fn test_stream_skips_malformed_lines() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/api/news/search/stream",
            MockResponse::Stream(vec![Bytes::from(
                "data: {\"type\":\"start\",\"query\":\"x\"}\ndata: {broken\ndata: {\"type\":\"complete\"}\n",
            )]),
        );
        let client = mock_client(mock);

        let mut stream = client
            .search_stream(&SearchParams::new("x"))
            .await
            .unwrap();

        let mut names = Vec::new();
        while let Some(item) = stream.next().await {
            names.push(item.unwrap().type_name());
        }
        assert_eq!(names, vec!["start", "complete"]);
    }

    #[tokio::test]
    async fn test_stream_surfaces_transport_error() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/api/news/trending/stream",
            MockResponse::StreamThenError(
                vec![Bytes::from("data: {\"type\":\"start\",\"category\":\"all\"}\n")],
                crate::traits::HttpError::Io("reset".to_string()),
            ),
        );
        let client = mock_client(mock);

        let mut stream = client
            .trending_stream(&TrendingParams::default())
            .await
            .unwrap();

        assert!(stream.next().await.unwrap().is_ok());
        assert!(matches!(
            stream.next().await.unwrap(),
            Err(ClientError::Transport(_))
        ));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_health_check() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://test/health",
            MockResponse::Success(crate::traits::Response::new(200, Bytes::from("ok"))),
        );
        let client = mock_client(mock);
        assert!(client.health_check().await.unwrap());
    }
}
