//! HTML metrics extraction
//!
//! This module computes the structural metrics reported for an analyzed page:
//! - HTML version (doctype sniffing on the raw body)
//! - Page title
//! - Heading counts by level (h1-h6)
//! - Link classification (internal / external / inaccessible)
//! - Login form detection

use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Structural metrics computed for one page
///
/// Serialized as the opaque result payload stored on a completed job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAnalysis {
    /// Content of `<head><title>`, empty when the page has none
    pub title: String,

    /// "HTML5", "HTML 4.01" or "Unknown"
    pub html_version: String,

    /// Heading counts keyed "h1".."h6"; levels with no headings are absent
    pub heading_counts: BTreeMap<String, u32>,

    /// Anchors resolving to the page's own host and port
    pub internal_links: u32,

    /// Anchors resolving anywhere else
    pub external_links: u32,

    /// Empty, fragment-only, or unresolvable anchors
    pub inaccessible_links: u32,

    /// True when any form contains a password-like input
    pub has_login_form: bool,
}

/// How a single anchor href is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkClass {
    Internal,
    External,
    Inaccessible,
}

/// Computes all metrics for a fetched page body
///
/// # Arguments
///
/// * `html` - The raw page body
/// * `page_url` - The URL the page was requested as; relative links resolve
///   against it and internal/external classification compares against its
///   host
///
/// # Example
///
/// ```
/// use sitelens::analyzer::analyze_html;
/// use url::Url;
///
/// let html = r#"<!DOCTYPE html><html><head><title>Home</title></head>
///               <body><h1>Hi</h1><a href="/about">About</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
///
/// let analysis = analyze_html(html, &page_url);
/// assert_eq!(analysis.title, "Home");
/// assert_eq!(analysis.html_version, "HTML5");
/// assert_eq!(analysis.internal_links, 1);
/// ```
pub fn analyze_html(html: &str, page_url: &Url) -> PageAnalysis {
    let document = Html::parse_document(html);

    let (internal_links, external_links, inaccessible_links) = count_links(&document, page_url);

    PageAnalysis {
        title: extract_title(&document),
        html_version: detect_html_version(html).to_string(),
        heading_counts: count_headings(&document),
        internal_links,
        external_links,
        inaccessible_links,
        has_login_form: detect_login_form(&document),
    }
}

/// Sniffs the HTML version from the raw body
///
/// Checked case-insensitively, in priority order: an HTML5 doctype, then any
/// "HTML 4.01" marker (legacy doctypes carry it), then Unknown.
fn detect_html_version(html: &str) -> &'static str {
    let lowered = html.to_lowercase();

    if lowered.contains("<!doctype html>") {
        "HTML5"
    } else if lowered.contains("html 4.01") {
        "HTML 4.01"
    } else {
        "Unknown"
    }
}

/// Extracts the page title from the document head
fn extract_title(document: &Html) -> String {
    let title_selector = match Selector::parse("head > title") {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default()
}

/// Counts headings by level into a "h1".."h6" keyed map
fn count_headings(document: &Html) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();

    for level in 1..=6 {
        let tag = format!("h{}", level);
        if let Some(selector) = Selector::parse(&tag).ok() {
            let count = document.select(&selector).count() as u32;
            if count > 0 {
                counts.insert(tag, count);
            }
        }
    }

    counts
}

/// Classifies every anchor href on the page
fn count_links(document: &Html, page_url: &Url) -> (u32, u32, u32) {
    let mut internal = 0;
    let mut external = 0;
    let mut inaccessible = 0;

    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            let href = element.value().attr("href").unwrap_or("");
            match classify_href(href, page_url) {
                LinkClass::Internal => internal += 1,
                LinkClass::External => external += 1,
                LinkClass::Inaccessible => inaccessible += 1,
            }
        }
    }

    (internal, external, inaccessible)
}

/// Classifies a single href
///
/// Empty and fragment-only hrefs are inaccessible, as is anything that fails
/// to parse or resolve. Relative hrefs resolve against the page URL. A
/// resolved link is internal when its host and port match the page's; links
/// without a host (mailto:, javascript:) therefore count as external.
fn classify_href(href: &str, page_url: &Url) -> LinkClass {
    let href = href.trim();

    if href.is_empty() || href == "#" {
        return LinkClass::Inaccessible;
    }

    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => match page_url.join(href) {
            Ok(url) => url,
            Err(_) => return LinkClass::Inaccessible,
        },
        Err(_) => return LinkClass::Inaccessible,
    };

    if resolved.host_str() == page_url.host_str() && resolved.port() == page_url.port() {
        LinkClass::Internal
    } else {
        LinkClass::External
    }
}

/// Looks for a login form anywhere on the page
///
/// A form counts when it contains an input whose type is "password" or whose
/// name contains "pass" or "login" (case-sensitive substring). The first
/// match wins.
fn detect_login_form(document: &Html) -> bool {
    let form_selector = match Selector::parse("form") {
        Ok(selector) => selector,
        Err(_) => return false,
    };
    let input_selector = match Selector::parse("input") {
        Ok(selector) => selector,
        Err(_) => return false,
    };

    for form in document.select(&form_selector) {
        for input in form.select(&input_selector) {
            let input_type = input.value().attr("type").unwrap_or("");
            let name = input.value().attr("name").unwrap_or("");

            if input_type == "password" || name.contains("pass") || name.contains("login") {
                return true;
            }
        }
    }

    false
}
