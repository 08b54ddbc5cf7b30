//! Exa search client
//!
//! Runs one query against the Exa search API and prints each result's URL,
//! title and matched passages. Used to eyeball what a real source would feed
//! the globe.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SEARCH_URL: &str = "https://api.exa.ai/search";
const TEXT_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Parser)]
#[command(name = "exa-search", version, about = "Query the Exa search API")]
struct Args {
    /// Search query
    #[arg(default_value = "What did Alan Turing say about machine intelligence?")]
    query: String,

    /// Search type (e.g. deep, neural, keyword, auto)
    #[arg(long = "type", default_value = "deep")]
    search_type: String,

    /// Number of results to request
    #[arg(long, default_value_t = 5)]
    num_results: u32,

    /// Request full page text alongside highlights
    #[arg(long)]
    contents: bool,

    /// API key
    #[arg(long, env = "EXA_API_KEY", hide_env_values = true)]
    api_key: String,
}

#[derive(Debug, Error)]
enum SearchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Search API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(rename = "type")]
    search_type: &'a str,
    num_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    contents: Option<ContentsOptions>,
}

#[derive(Debug, Serialize)]
struct ContentsOptions {
    text: bool,
    highlights: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    highlights: Option<Vec<String>>,
    #[serde(default)]
    text: Option<String>,
}

async fn search(client: &reqwest::Client, args: &Args) -> Result<SearchResponse, SearchError> {
    let request = SearchRequest {
        query: &args.query,
        search_type: &args.search_type,
        num_results: args.num_results,
        contents: args.contents.then_some(ContentsOptions {
            text: true,
            highlights: true,
        }),
    };

    let response = client
        .post(SEARCH_URL)
        .header("x-api-key", &args.api_key)
        .header("content-type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SearchError::Api { status, body });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Printable report of the results, one block per result
fn render(results: &[SearchResult]) -> String {
    let mut out = String::new();

    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(out, "\nResult {}:", i + 1);
        let _ = writeln!(out, "URL: {}", result.url);
        let _ = writeln!(out, "Title: {}", result.title.as_deref().unwrap_or(""));

        match result.highlights.as_deref() {
            Some(highlights) if !highlights.is_empty() => {
                let _ = writeln!(out, "Matched Passages:");
                for highlight in highlights {
                    let _ = writeln!(out, "  → {highlight}");
                }
            }
            _ => {
                let _ = writeln!(out, "  (No highlights)");
            }
        }

        if let Some(text) = &result.text {
            let preview: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
            let _ = writeln!(out, "Text: {preview}");
        }
    }

    out
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exa_search=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    tracing::info!(query = %args.query, search_type = %args.search_type, "Searching");

    let client = reqwest::Client::new();
    let response = search(&client, &args).await.inspect_err(|e| {
        tracing::error!(error = %e, "Search failed");
    })?;

    tracing::info!(results = response.results.len(), "Search complete");
    print!("{}", render(&response.results));
    Ok(())
}
