//! Request parameter types for the two streaming endpoints.
//!
//! These mirror the query parameters the backend accepts. The builder-style
//! `with_*` methods keep call sites readable when only a subset of
//! parameters differs from the defaults.

use serde::{Deserialize, Serialize};

/// Which streaming endpoint a session targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Per-category trending headlines.
    Trending,
    /// Keyword search with pagination and sorting.
    Search,
}

impl StreamKind {
    /// Short name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Trending => "trending",
            StreamKind::Search => "search",
        }
    }
}

/// Sort modes accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Newest first.
    #[default]
    DateDesc,
    /// Oldest first.
    DateAsc,
    /// Backend relevance score, highest first.
    Relevance,
}

impl SortMode {
    /// Wire value for the `sort` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::DateDesc => "date_desc",
            SortMode::DateAsc => "date_asc",
            SortMode::Relevance => "relevance",
        }
    }

    /// Parse a wire/CLI value. Unrecognized values are rejected rather than
    /// silently mapped to a default.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date_desc" => Some(SortMode::DateDesc),
            "date_asc" => Some(SortMode::DateAsc),
            "relevance" => Some(SortMode::Relevance),
            _ => None,
        }
    }
}

/// Source selection: either every configured site or an explicit list of
/// source keys (`bbc`, `scmp`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    Keys(Vec<String>),
}

impl SourceSelection {
    /// Parse the comma-separated CLI/API form. The sentinel `all` (alone)
    /// selects every source; keys are lowercased and trimmed.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("all") {
            return SourceSelection::All;
        }
        let keys: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if keys.is_empty() {
            SourceSelection::All
        } else {
            SourceSelection::Keys(keys)
        }
    }

    /// Wire value for the `sources` query parameter.
    pub fn to_query_value(&self) -> String {
        match self {
            SourceSelection::All => "all".to_string(),
            SourceSelection::Keys(keys) => keys.join(","),
        }
    }

    /// Number of sources this selection requests, if knowable up front.
    /// `All` is `None` because the set of configured sites belongs to the
    /// backend; the session learns the total from the first progress report.
    pub fn requested_count(&self) -> Option<usize> {
        match self {
            SourceSelection::All => None,
            SourceSelection::Keys(keys) => Some(keys.len()),
        }
    }
}

impl Default for SourceSelection {
    fn default() -> Self {
        SourceSelection::All
    }
}

/// Parameters for the trending stream endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingParams {
    /// Category filter (`all`, `news`, `sports`, `business`, ...).
    pub category: String,
    /// Articles per site, 1-10.
    pub limit: u32,
    pub sources: SourceSelection,
}

impl Default for TrendingParams {
    fn default() -> Self {
        Self {
            category: "all".to_string(),
            limit: 2,
            sources: SourceSelection::All,
        }
    }
}

impl TrendingParams {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sources(mut self, sources: SourceSelection) -> Self {
        self.sources = sources;
        self
    }
}

/// Parameters for the search stream endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub query: String,
    /// 1-based page number.
    pub page: u32,
    /// Articles per site per page, 1-10.
    pub per_site_limit: u32,
    pub sources: SourceSelection,
    pub sort: SortMode,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            per_site_limit: 10,
            sources: SourceSelection::All,
            sort: SortMode::default(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_per_site_limit(mut self, limit: u32) -> Self {
        self.per_site_limit = limit;
        self
    }

    pub fn with_sources(mut self, sources: SourceSelection) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }
}

/// Parameters for one streaming session, discriminated by endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionParams {
    Trending(TrendingParams),
    Search(SearchParams),
}

impl SessionParams {
    pub fn kind(&self) -> StreamKind {
        match self {
            SessionParams::Trending(_) => StreamKind::Trending,
            SessionParams::Search(_) => StreamKind::Search,
        }
    }

    pub fn sources(&self) -> &SourceSelection {
        match self {
            SessionParams::Trending(p) => &p.sources,
            SessionParams::Search(p) => &p.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_round_trip() {
        for mode in [SortMode::DateDesc, SortMode::DateAsc, SortMode::Relevance] {
            assert_eq!(SortMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(SortMode::parse("newest"), None);
    }

    #[test]
    fn test_source_selection_all_sentinel() {
        assert_eq!(SourceSelection::parse("all"), SourceSelection::All);
        assert_eq!(SourceSelection::parse("ALL"), SourceSelection::All);
        assert_eq!(SourceSelection::parse(""), SourceSelection::All);
        assert_eq!(SourceSelection::All.to_query_value(), "all");
        assert_eq!(SourceSelection::All.requested_count(), None);
    }

    #[test]
    fn test_source_selection_keys() {
        let sel = SourceSelection::parse("BBC, scmp ,nypost");
        assert_eq!(
            sel,
            SourceSelection::Keys(vec![
                "bbc".to_string(),
                "scmp".to_string(),
                "nypost".to_string()
            ])
        );
        assert_eq!(sel.to_query_value(), "bbc,scmp,nypost");
        assert_eq!(sel.requested_count(), Some(3));
    }

    #[test]
    fn test_trending_params_builder() {
        let params = TrendingParams::new("sports")
            .with_limit(5)
            .with_sources(SourceSelection::parse("bbc,thesun"));
        assert_eq!(params.category, "sports");
        assert_eq!(params.limit, 5);
        assert_eq!(params.sources.requested_count(), Some(2));
    }

    #[test]
    fn test_search_params_builder() {
        let params = SearchParams::new("climate")
            .with_page(2)
            .with_per_site_limit(3)
            .with_sort(SortMode::Relevance);
        assert_eq!(params.page, 2);
        assert_eq!(params.per_site_limit, 3);
        assert_eq!(params.sort, SortMode::Relevance);
    }

    #[test]
    fn test_session_params_kind() {
        let trending = SessionParams::Trending(TrendingParams::default());
        let search = SessionParams::Search(SearchParams::new("q"));
        assert_eq!(trending.kind(), StreamKind::Trending);
        assert_eq!(search.kind(), StreamKind::Search);
        assert_eq!(trending.kind().as_str(), "trending");
    }
}
