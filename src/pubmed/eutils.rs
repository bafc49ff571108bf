//! E-utilities client: esearch, esummary, and elink with request pacing.
//!
//! Three endpoints cover what the pipeline needs:
//! - `esearch` finds candidate PubMed ids for a publication title,
//! - `esummary` fetches an id's title and publication date, used to pick
//!   the right id when esearch returns several,
//! - `elink` with the `pubmed_pmc_refs` link name lists the PubMed Central
//!   articles citing an id; their count is the citation count.
//!
//! NCBI asks clients without an API key to stay under one request per
//! couple of seconds and allows ten per second with one; the rate limiter
//! enforces that pace across all three endpoints. Every request carries the
//! `tool` and (when configured) `email` and `api_key` etiquette parameters.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// The public E-utilities endpoint.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// `tool` parameter sent with every request, per NCBI usage policy.
const TOOL: &str = "standards-influence";

// Request pacing without and with an API key.
const KEYLESS_PERIOD: Duration = Duration::from_millis(2000);
const KEYED_PERIOD: Duration = Duration::from_millis(100);

/// Errors that can occur talking to E-utilities
#[derive(Debug, Error)]
pub enum EutilsError {
    #[error("E-utilities request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("E-utilities {endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("failed to parse {endpoint} response: {detail}")]
    Parse {
        endpoint: &'static str,
        detail: String,
    },
}

/// An esummary record, reduced to the fields the pipeline reads.
#[derive(Debug, Clone)]
pub struct PubSummary {
    /// Publication year, the first digit run in the record's `pubdate`.
    pub year: Option<i32>,
    /// Title with any trailing period stripped.
    pub title: String,
}

pub struct EutilsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    contact_email: Option<String>,
    limiter: DefaultDirectRateLimiter,
}

impl EutilsClient {
    /// Build a client. `base_url` overrides the public endpoint (tests point
    /// it at a local server); an `api_key` raises the request pace.
    pub fn new(
        base_url: Option<&str>,
        api_key: Option<&str>,
        contact_email: Option<&str>,
    ) -> Self {
        let period = if api_key.is_some() {
            KEYED_PERIOD
        } else {
            KEYLESS_PERIOD
        };
        Self {
            client: Client::new(),
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.map(str::to_string),
            contact_email: contact_email.map(str::to_string),
            limiter: RateLimiter::direct(
                Quota::with_period(period).expect("pacing period is nonzero"),
            ),
        }
    }

    /// The PubMed id for a publication title, if one can be pinned down.
    /// Zero esearch hits mean no id; a single hit is trusted; several hits
    /// are disambiguated by comparing each esummary title to the query
    /// title, ignoring case.
    pub async fn pm_id_for_title(&self, title: &str) -> Result<Option<u64>, EutilsError> {
        let response = self
            .get_json("esearch.fcgi", &[("db", "pubmed"), ("term", title)])
            .await?;

        let ids: Vec<u64> = response
            .get("esearchresult")
            .and_then(|r| r.get("idlist"))
            .and_then(|l| l.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|id| id.as_str().and_then(|s| s.parse().ok()))
                    .collect()
            })
            .ok_or_else(|| EutilsError::Parse {
                endpoint: "esearch",
                detail: "missing esearchresult.idlist".to_string(),
            })?;

        match ids.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => {
                debug!(candidates = ids.len(), query = %title, "Disambiguating PubMed ids by title");
                for id in ids {
                    let summary = self.summary(id).await?;
                    if summary.title.eq_ignore_ascii_case(title) {
                        return Ok(Some(id));
                    }
                }
                Ok(None)
            }
        }
    }

    /// Title and publication year of a PubMed record.
    pub async fn summary(&self, pm_id: u64) -> Result<PubSummary, EutilsError> {
        let id = pm_id.to_string();
        let response = self
            .get_json("esummary.fcgi", &[("db", "pubmed"), ("id", &id)])
            .await?;

        let record = response
            .get("result")
            .and_then(|r| r.get(&id))
            .ok_or_else(|| EutilsError::Parse {
                endpoint: "esummary",
                detail: format!("no record for id {}", pm_id),
            })?;

        let pubdate = record
            .get("pubdate")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let year = first_digit_run(pubdate);
        if year.is_none() {
            warn!(pm_id, pubdate = %pubdate, "No year found in pubdate");
        }

        let title = record
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        Ok(PubSummary {
            year,
            title: title.strip_suffix('.').unwrap_or(title).to_string(),
        })
    }

    /// How many PubMed Central articles cite a PubMed record: the size of
    /// the `pubmed_pmc_refs` link set, zero when the set is absent.
    pub async fn citation_count(&self, pm_id: u64) -> Result<u64, EutilsError> {
        let id = pm_id.to_string();
        let response = self
            .get_json(
                "elink.fcgi",
                &[
                    ("dbfrom", "pubmed"),
                    ("linkname", "pubmed_pmc_refs"),
                    ("id", &id),
                ],
            )
            .await?;

        let count = response
            .get("linksets")
            .and_then(|v| v.as_array())
            .and_then(|sets| sets.first())
            .and_then(|set| set.get("linksetdbs"))
            .and_then(|v| v.as_array())
            .and_then(|dbs| {
                dbs.iter().find(|db| {
                    db.get("linkname").and_then(|v| v.as_str()) == Some("pubmed_pmc_refs")
                })
            })
            .and_then(|db| db.get("links"))
            .and_then(|v| v.as_array())
            .map(|links| links.len() as u64)
            .unwrap_or(0);

        Ok(count)
    }

    async fn get_json(
        &self,
        endpoint: &'static str,
        params: &[(&str, &str)],
    ) -> Result<Value, EutilsError> {
        self.limiter.until_ready().await;

        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("retmode", "json"));
        query.push(("tool", TOOL));
        if let Some(email) = &self.contact_email {
            query.push(("email", email));
        }
        if let Some(key) = &self.api_key {
            query.push(("api_key", key));
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, "E-utilities request");
        let response = self.client.get(&url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EutilsError::Status { endpoint, status });
        }
        Ok(response.json::<Value>().await?)
    }
}

/// The first maximal run of decimal digits, as an integer. Pubdates read
/// like "2003 Mar 1" or "2010 Winter".
fn first_digit_run(text: &str) -> Option<i32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let run: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    run.parse().ok()
}
