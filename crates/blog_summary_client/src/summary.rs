//! crates/blog_summary_client/src/summary.rs
//!
//! Client for the external scrape-and-summarize service.

use async_trait::async_trait;
use blog_summary_core::domain::{SiteOutcome, SummaryResult};
use blog_summary_core::ports::{PortResult, SummaryService};
use blog_summary_core::summary::{combine_site_results, normalize_topic, sites_param};
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::auth::api_error;
use crate::config::{endpoint, ClientConfig};
use crate::error::ClientError;

#[derive(Clone)]
pub struct SummaryClient {
    http: Client,
    base_url: String,
}

impl SummaryClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.summary_base_url.clone(),
        })
    }

    /// Fetches and combines the summaries of `topic` from every selected website.
    pub async fn get_article_summary(
        &self,
        websites: &[String],
        topic: &str,
    ) -> Result<SummaryResult, ClientError> {
        let topic = normalize_topic(topic)?;
        let results = self.fetch_results(topic, websites).await?;
        Ok(combine_site_results(topic, websites, &results)?)
    }

    async fn fetch_results(
        &self,
        topic: &str,
        websites: &[String],
    ) -> Result<BTreeMap<String, SiteOutcome>, ClientError> {
        let sites = sites_param(websites);
        debug!(keyword = topic, sites = %sites, "Requesting summaries");

        let response = self
            .http
            .get(endpoint(&self.base_url, "/scrape-and-summarize"))
            .query(&[("keyword", topic), ("sites", sites.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response, "Failed to fetch summary").await);
        }

        let body: Value = response.json().await?;
        parse_results(body)
    }
}

/// Reads the `results` object. A site whose entry has an unexpected shape becomes an error outcome.
fn parse_results(body: Value) -> Result<BTreeMap<String, SiteOutcome>, ClientError> {
    let Some(Value::Object(results)) = body.get("results").cloned() else {
        return Err(ClientError::InvalidResponse(
            "'results' missing or not an object".to_string(),
        ));
    };

    Ok(results
        .into_iter()
        .map(|(site, raw)| {
            let outcome = serde_json::from_value::<SiteOutcome>(raw).unwrap_or_else(|e| {
                warn!("Unrecognized result for {}: {}", site, e);
                SiteOutcome::Error {
                    error: format!("unrecognized result: {}", e),
                }
            });
            (site, outcome)
        })
        .collect())
}

#[async_trait]
impl SummaryService for SummaryClient {
    async fn scrape_and_summarize(
        &self,
        topic: &str,
        sites: &[String],
    ) -> PortResult<BTreeMap<String, SiteOutcome>> {
        let topic = normalize_topic(topic)?;
        Ok(self.fetch_results(topic, sites).await?)
    }
}
