//! Google Scholar citation sources.
//!
//! The pipeline looks up each curated title once and keeps the citation
//! count and publication year of the first result. Live lookups go through
//! SerpApi and are billable, so an offline deterministic source exists for
//! tests and dry runs; both sit behind the same trait.

pub mod mock;
pub mod serpapi;

pub use mock::MockScholar;
pub use serpapi::SerpApiScholar;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during a Scholar lookup
#[derive(Debug, Error)]
pub enum ScholarError {
    #[error("SerpApi key not configured")]
    NoApiKey,

    #[error("Scholar request failed: {0}")]
    RequestFailed(String),

    #[error("no Scholar results for '{0}'")]
    NoResults(String),

    #[error("failed to parse Scholar results: {0}")]
    ParseError(String),
}

/// What one Scholar lookup returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScholarRecord {
    /// Title of the first result, logged against the query title.
    pub title: String,
    /// Citation count of the first result.
    pub citations: Option<u64>,
    /// Publication year of the first result.
    pub year: Option<i32>,
}

/// A source of Google Scholar citation data.
#[async_trait]
pub trait ScholarSource: Send + Sync {
    async fn lookup(&self, title: &str) -> Result<ScholarRecord, ScholarError>;
}

/// Pick the Scholar source for a run: the deterministic mock, or the live
/// SerpApi client, which needs a non-empty key.
pub fn scholar_source(
    mock: bool,
    serp_api_key: Option<&str>,
) -> Result<Box<dyn ScholarSource>, ScholarError> {
    if mock {
        return Ok(Box::new(MockScholar));
    }
    match serp_api_key {
        Some(key) if !key.is_empty() => Ok(Box::new(SerpApiScholar::new(key))),
        _ => Err(ScholarError::NoApiKey),
    }
}
