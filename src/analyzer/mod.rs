//! Analyzer module for page fetching and metrics extraction
//!
//! This module contains the per-job analysis pipeline:
//! - HTTP fetching of the submitted URL
//! - HTML metrics extraction (version, title, headings, links, login form)
//! - Serialization of the metrics into the opaque result payload

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, fetch_page};
pub use parser::{analyze_html, PageAnalysis};

use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Errors that can occur while analyzing a page
///
/// All of these are job-level outcomes: the worker records them on the job as
/// a terminal failure and moves on.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}: status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to serialize analysis: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fetches and analyzes pages, one URL per call
///
/// Owns the HTTP client so connections are reused across jobs.
pub struct Analyzer {
    client: Client,
}

impl Analyzer {
    /// Creates an analyzer with a freshly built HTTP client
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    /// Fetches the page at `url` and returns the serialized metrics payload
    ///
    /// The whole analysis short-circuits on any fetch-stage error; nothing is
    /// salvaged from a partially loaded page.
    ///
    /// # Arguments
    ///
    /// * `url` - The job's target URL; also the base for resolving relative
    ///   links, regardless of any redirects followed during the fetch
    pub async fn analyze(&self, url: &str) -> Result<String, AnalyzerError> {
        let page_url = Url::parse(url).map_err(|source| AnalyzerError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let body = fetch_page(&self.client, url).await?;
        let analysis = analyze_html(&body, &page_url);

        Ok(serde_json::to_string(&analysis)?)
    }
}
