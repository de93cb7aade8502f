//! crates/blog_summary_core/src/summary.rs
//!
//! Aggregation of per-site summaries into a single result for a topic.

use std::collections::BTreeMap;

use crate::domain::{SiteOutcome, Source, SummaryResult};
use crate::ports::{PortError, PortResult};

/// Sites queried when the caller did not select any.
pub const DEFAULT_SITES: [&str; 3] = ["medium", "wix", "devto"];

const SUMMARY_SEPARATOR: &str = "\n\n";

/// The `sites` query value for a selection: comma-joined, or the defaults when empty.
pub fn sites_param(websites: &[String]) -> String {
    if websites.is_empty() {
        DEFAULT_SITES.join(",")
    } else {
        websites.join(",")
    }
}

/// Trims the topic, rejecting a blank one before any request is made.
pub fn normalize_topic(topic: &str) -> PortResult<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(PortError::Invalid("A topic is required".to_string()));
    }
    Ok(topic)
}

fn fallback_text(website: &str) -> String {
    format!("No summary available for {}.", website)
}

/// Combines the service's per-site outcomes into one summary, in selection order.
///
/// Sites with an error outcome, or with no outcome at all, contribute a fallback
/// sentence and no sources. Only an empty selection yields an error.
pub fn combine_site_results(
    topic: &str,
    websites: &[String],
    results: &BTreeMap<String, SiteOutcome>,
) -> PortResult<SummaryResult> {
    let mut pieces: Vec<String> = Vec::with_capacity(websites.len());
    let mut sources: Vec<Source> = Vec::new();

    for website in websites {
        match results.get(website) {
            Some(SiteOutcome::Summary(site)) => {
                let text = site
                    .summary
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_text(website));
                pieces.push(text);
                sources.extend(site.sources.iter().cloned());
            }
            Some(SiteOutcome::Error { error }) => {
                tracing::warn!("Summary service reported an error for {}: {}", website, error);
                pieces.push(fallback_text(website));
            }
            None => {
                tracing::warn!("No data for website: {}", website);
                pieces.push(fallback_text(website));
            }
        }
    }

    let summary = pieces.join(SUMMARY_SEPARATOR);
    if summary.is_empty() {
        return Err(PortError::NotFound(
            "No summaries available for selected websites".to_string(),
        ));
    }

    Ok(SummaryResult {
        topic: topic.to_string(),
        summary,
        sources,
    })
}
