//! Regulatory-update feed client and document correlator.
//!
//! The feed is an externally controlled JSON endpoint; records arrive
//! unvalidated, so every field defaults to an empty string at the serde
//! boundary instead of failing the fetch.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching the regulatory feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Request timed out before the feed responded.
    #[error("Regulatory feed request timed out")]
    Timeout,
    /// Feed endpoint could not be reached.
    #[error("Regulatory feed unreachable: {0}")]
    Unreachable(String),
    /// Feed responded with a non-success status.
    #[error("Unexpected regulatory feed response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the feed.
        status: reqwest::StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Feed body could not be decoded as the expected JSON shape.
    #[error("Invalid regulatory feed payload: {0}")]
    InvalidPayload(String),
}

/// Single record from the regulatory feed.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RegulatoryUpdate {
    /// Section label referenced by the update.
    #[serde(default)]
    pub section: String,
    /// Sub-section label referenced by the update.
    #[serde(default)]
    pub sub_section: String,
    /// Free-form description of the change.
    #[serde(default)]
    pub update: String,
}

/// Regulatory update whose section labels both appear in a document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AffectedSection {
    /// Matched section label.
    pub section: String,
    /// Matched sub-section label.
    pub sub_section: String,
    /// Description of the regulatory change.
    pub update: String,
}

#[derive(Deserialize)]
struct FeedResponse {
    #[serde(default)]
    regulatory_updates: Vec<RegulatoryUpdate>,
}

/// HTTP client for the regulatory-update feed.
pub struct RegulatoryFeedClient {
    client: Client,
    url: String,
}

impl RegulatoryFeedClient {
    /// Construct a client for the given feed endpoint.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent("legalens/0.1")
            .timeout(timeout)
            .build()
            .map_err(|err| FeedError::Unreachable(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the current list of regulatory updates.
    pub async fn fetch_updates(&self) -> Result<Vec<RegulatoryUpdate>, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = FeedError::UnexpectedStatus { status, body };
            tracing::warn!(error = %error, "Regulatory feed returned failure status");
            return Err(error);
        }

        let feed: FeedResponse = response
            .json()
            .await
            .map_err(|err| FeedError::InvalidPayload(err.to_string()))?;
        tracing::debug!(updates = feed.regulatory_updates.len(), "Fetched regulatory feed");
        Ok(feed.regulatory_updates)
    }
}

fn classify_transport_error(err: reqwest::Error) -> FeedError {
    if err.is_timeout() {
        FeedError::Timeout
    } else {
        FeedError::Unreachable(err.to_string())
    }
}

/// Match regulatory updates against document text.
///
/// A record qualifies when both its section and sub-section labels appear
/// case-insensitively as substrings of the text, not necessarily in the same
/// sentence. Records with an empty label on either half are excluded
/// outright; an empty substring would otherwise match any document. Output
/// order follows the feed.
pub fn correlate(document_text: &str, updates: &[RegulatoryUpdate]) -> Vec<AffectedSection> {
    let haystack = document_text.to_lowercase();

    updates
        .iter()
        .filter(|update| {
            let section = update.section.trim().to_lowercase();
            let sub_section = update.sub_section.trim().to_lowercase();
            !section.is_empty()
                && !sub_section.is_empty()
                && haystack.contains(&section)
                && haystack.contains(&sub_section)
        })
        .map(|update| AffectedSection {
            section: update.section.clone(),
            sub_section: update.sub_section.clone(),
            update: update.update.clone(),
        })
        .collect()
}
