//! crates/blog_summary_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or transport.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

//=========================================================================================
// Users
//=========================================================================================

/// The public view of a user. This is the only user shape that ever leaves the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// A user about to be persisted. The password has already been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

//=========================================================================================
// Summaries
//=========================================================================================

/// A single article that contributed to a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub website: String,
}

/// The summary produced for one website.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub sources: Vec<Source>,
}

/// Anything other than an array of sources reads as no sources. Entries that are not
/// sources are skipped.
fn lenient_sources<'de, D>(deserializer: D) -> Result<Vec<Source>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// What the summary service reported for one website: `{summary, sources}` or `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteOutcome {
    Error { error: String },
    Summary(SiteSummary),
}

/// The combined summary for a topic across every selected website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub topic: String,
    pub summary: String,
    pub sources: Vec<Source>,
}

//=========================================================================================
// Client Sessions
//=========================================================================================

/// A signed-in client: the user returned by the backend plus the bearer token to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_array_sources_keep_the_summary() {
        for sources in [json!(null), json!("none"), json!({ "title": "t" })] {
            let outcome: SiteOutcome =
                serde_json::from_value(json!({ "summary": "Real summary", "sources": sources }))
                    .unwrap();
            assert_eq!(
                outcome,
                SiteOutcome::Summary(SiteSummary {
                    summary: Some("Real summary".to_string()),
                    sources: vec![],
                })
            );
        }
    }

    #[test]
    fn malformed_source_entries_are_skipped() {
        let summary: SiteSummary = serde_json::from_value(json!({
            "summary": "s",
            "sources": [
                { "title": "a", "url": "https://a", "website": "medium" },
                42
            ]
        }))
        .unwrap();
        assert_eq!(summary.sources.len(), 1);
        assert_eq!(summary.sources[0].title, "a");
    }

    #[test]
    fn error_entries_stay_errors() {
        let outcome: SiteOutcome = serde_json::from_value(json!({ "error": "down" })).unwrap();
        assert_eq!(outcome, SiteOutcome::Error { error: "down".to_string() });
    }
}
