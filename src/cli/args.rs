//! Command-line argument parsing for the newswire CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use crate::client::DEFAULT_BASE_URL;
use crate::models::{SearchParams, SessionParams, SortMode, SourceSelection, TrendingParams};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run a streaming session against the backend
    Run {
        base_url: String,
        params: SessionParams,
    },
}

/// Usage text printed by `--help` and on argument errors.
pub const USAGE: &str = "\
Usage:
  newswire trending [--category CATEGORY] [--limit N] [--sources LIST]
  newswire search QUERY [--page N] [--per-site-limit N] [--sort MODE] [--sources LIST]

Options:
      --base-url URL        Backend base URL (default: http://localhost:8000)
      --category CATEGORY   Trending category (default: all)
      --limit N             Articles per site, 1-10 (default: 2)
      --page N              Result page, 1-based (default: 1)
      --per-site-limit N    Articles per site per page, 1-10 (default: 10)
      --sort MODE           date_desc, date_asc, or relevance (default: date_desc)
      --sources LIST        Comma-separated source keys, or 'all' (default: all)
  -V, --version             Show version
  -h, --help                Show this help";

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
pub fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();

    // Global flags win regardless of position.
    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            _ => {}
        }
    }

    let mut iter = args.into_iter().peekable();
    let Some(subcommand) = iter.next() else {
        return Ok(CliCommand::Help);
    };

    match subcommand.as_str() {
        "trending" => parse_trending(iter),
        "search" => parse_search(iter),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn parse_trending<I>(mut iter: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    let mut base_url = DEFAULT_BASE_URL.to_string();
    let mut params = TrendingParams::default();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--base-url" => base_url = require_value(&arg, iter.next())?,
            "--category" => params.category = require_value(&arg, iter.next())?,
            "--limit" => params.limit = parse_bounded(&arg, iter.next(), 1, 10)?,
            "--sources" => {
                params.sources = SourceSelection::parse(&require_value(&arg, iter.next())?)
            }
            other => return Err(format!("unknown option '{}' for trending", other)),
        }
    }

    Ok(CliCommand::Run {
        base_url,
        params: SessionParams::Trending(params),
    })
}

fn parse_search<I>(mut iter: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    let mut base_url = DEFAULT_BASE_URL.to_string();
    let mut query: Option<String> = None;
    let mut page = 1;
    let mut per_site_limit = 10;
    let mut sources = SourceSelection::All;
    let mut sort = SortMode::default();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--base-url" => base_url = require_value(&arg, iter.next())?,
            "--page" => page = parse_bounded(&arg, iter.next(), 1, u32::MAX)?,
            "--per-site-limit" => per_site_limit = parse_bounded(&arg, iter.next(), 1, 10)?,
            "--sources" => sources = SourceSelection::parse(&require_value(&arg, iter.next())?),
            "--sort" => {
                let value = require_value(&arg, iter.next())?;
                sort = SortMode::parse(&value)
                    .ok_or_else(|| format!("invalid sort mode '{}'", value))?;
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown option '{}' for search", other));
            }
            word => match &mut query {
                // Bare words form the query so quoting isn't required.
                Some(q) => {
                    q.push(' ');
                    q.push_str(word);
                }
                None => query = Some(word.to_string()),
            },
        }
    }

    let query = query.ok_or_else(|| "search requires a query".to_string())?;
    let params = SearchParams::new(query)
        .with_page(page)
        .with_per_site_limit(per_site_limit)
        .with_sources(sources)
        .with_sort(sort);

    Ok(CliCommand::Run {
        base_url,
        params: SessionParams::Search(params),
    })
}

fn require_value(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_bounded(flag: &str, value: Option<String>, min: u32, max: u32) -> Result<u32, String> {
    let raw = require_value(flag, value)?;
    let parsed: u32 = raw
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, raw))?;
    if parsed < min || parsed > max {
        return Err(format!("{} must be between {} and {}", flag, min, max));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, String> {
        let mut full = vec!["newswire".to_string()];
        full.extend(args.iter().map(|s| s.to_string()));
        parse_args(full.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["trending", "--version"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_no_args_shows_help() {
        assert_eq!(parse(&[]), Ok(CliCommand::Help));
        assert_eq!(parse(&["--help"]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_trending_defaults() {
        let command = parse(&["trending"]).unwrap();
        match command {
            CliCommand::Run {
                base_url,
                params: SessionParams::Trending(p),
            } => {
                assert_eq!(base_url, DEFAULT_BASE_URL);
                assert_eq!(p.category, "all");
                assert_eq!(p.limit, 2);
                assert_eq!(p.sources, SourceSelection::All);
            }
            other => panic!("expected trending run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_trending_options() {
        let command = parse(&[
            "trending",
            "--category",
            "sports",
            "--limit",
            "5",
            "--sources",
            "bbc,scmp",
            "--base-url",
            "http://10.0.0.2:8000",
        ])
        .unwrap();
        match command {
            CliCommand::Run {
                base_url,
                params: SessionParams::Trending(p),
            } => {
                assert_eq!(base_url, "http://10.0.0.2:8000");
                assert_eq!(p.category, "sports");
                assert_eq!(p.limit, 5);
                assert_eq!(p.sources.requested_count(), Some(2));
            }
            other => panic!("expected trending run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_multi_word_query() {
        let command = parse(&["search", "climate", "policy", "--sort", "relevance"]).unwrap();
        match command {
            CliCommand::Run {
                params: SessionParams::Search(p),
                ..
            } => {
                assert_eq!(p.query, "climate policy");
                assert_eq!(p.sort, SortMode::Relevance);
                assert_eq!(p.page, 1);
            }
            other => panic!("expected search run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_requires_query() {
        assert!(parse(&["search"]).unwrap_err().contains("query"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_limit() {
        assert!(parse(&["trending", "--limit", "11"]).is_err());
        assert!(parse(&["trending", "--limit", "0"]).is_err());
        assert!(parse(&["search", "x", "--per-site-limit", "99"]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_sort() {
        assert!(parse(&["search", "x", "--sort", "newest"])
            .unwrap_err()
            .contains("sort"));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(parse(&["serve"]).is_err());
        assert!(parse(&["trending", "--frobnicate"]).is_err());
    }
}
