//! HTTP fetching for page analysis
//!
//! This module builds the shared HTTP client and performs the single GET the
//! analyzer needs. Redirects are followed; compressed responses are handled
//! transparently.

use crate::analyzer::AnalyzerError;
use reqwest::Client;

/// Builds the HTTP client used for all page fetches
///
/// The client carries no request timeout: the worker processes one job at a
/// time and a fetch blocks it until the server responds or the connection
/// drops.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body for analysis
///
/// Any transport failure or non-success status is an error; no partial body
/// is ever returned.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, AnalyzerError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| AnalyzerError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AnalyzerError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| AnalyzerError::Fetch {
        url: url.to_string(),
        source,
    })
}
