//! Live Google Scholar lookups via SerpApi.
//!
//! One `google_scholar` engine query per title. Only the first organic
//! result is used: its `inline_links.cited_by.total` is the citation count,
//! and the publication year is the first 4-digit token of
//! `publication_info.summary` (summaries read like
//! "M Hucka, A Finney - Bioinformatics, 2003 - academic.oup.com").

use super::{ScholarError, ScholarRecord, ScholarSource};
use async_trait::async_trait;
use serde_json::Value;
use serpapi_search_rust::serp_api_search::SerpApiSearch;
use std::collections::HashMap;
use tracing::{debug, info};

pub struct SerpApiScholar {
    api_key: String,
}

impl SerpApiScholar {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ScholarSource for SerpApiScholar {
    async fn lookup(&self, title: &str) -> Result<ScholarRecord, ScholarError> {
        info!(query = %title, "Searching Google Scholar via SerpApi");

        let mut params = HashMap::<String, String>::new();
        params.insert("engine".to_string(), "google_scholar".to_string());
        params.insert("q".to_string(), title.to_string());
        params.insert("hl".to_string(), "en".to_string());

        let search = SerpApiSearch::google(params, self.api_key.clone());
        let results = search
            .json()
            .await
            .map_err(|e| ScholarError::RequestFailed(e.to_string()))?;

        debug!("Raw Scholar response received");
        record_from_response(title, &results)
    }
}

/// Extract a `ScholarRecord` from a SerpApi response body.
fn record_from_response(query: &str, results: &Value) -> Result<ScholarRecord, ScholarError> {
    let organic_results = results
        .get("organic_results")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ScholarError::ParseError("expected organic_results array".to_string()))?;

    let first = organic_results
        .first()
        .ok_or_else(|| ScholarError::NoResults(query.to_string()))?;

    let title = first
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("Untitled")
        .to_string();

    let citations = first
        .get("inline_links")
        .and_then(|links| links.get("cited_by"))
        .and_then(|cited| cited.get("total"))
        .and_then(|v| v.as_u64());

    let year = first
        .get("publication_info")
        .and_then(|p| p.get("summary"))
        .and_then(|v| v.as_str())
        .and_then(publication_year);

    debug!(result_title = %title, ?citations, ?year, "First Scholar result parsed");
    Ok(ScholarRecord {
        title,
        citations,
        year,
    })
}

/// The first 4-digit token of a publication summary, taken as the year.
fn publication_year(summary: &str) -> Option<i32> {
    summary
        .split(|c: char| !c.is_numeric())
        .find(|part| part.len() == 4)
        .and_then(|y| y.parse::<i32>().ok())
        .filter(|&y| (1900..=2035).contains(&y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publication_year() {
        assert_eq!(
            publication_year("M Hucka, A Finney - Bioinformatics, 2003 - academic.oup.com"),
            Some(2003)
        );
        // the first 4-digit token wins
        assert_eq!(publication_year("Proc. 2010 conf., 2012"), Some(2010));
        // digit runs of other lengths are not years
        assert_eq!(publication_year("pages 10334-10340"), None);
        // out-of-range tokens are rejected
        assert_eq!(publication_year("catalog 1551, reprinted"), None);
        assert_eq!(publication_year("no year here"), None);
    }

    #[test]
    fn test_record_from_response() {
        let response = json!({
            "organic_results": [{
                "title": "The systems biology markup language (SBML)",
                "publication_info": {
                    "summary": "M Hucka, A Finney - Bioinformatics, 2003 - academic.oup.com"
                },
                "inline_links": { "cited_by": { "total": 4382 } }
            }]
        });

        let record = record_from_response("the query", &response).unwrap();
        assert_eq!(record.title, "The systems biology markup language (SBML)");
        assert_eq!(record.citations, Some(4382));
        assert_eq!(record.year, Some(2003));
    }

    #[test]
    fn test_record_with_missing_fields_keeps_blanks() {
        let response = json!({
            "organic_results": [{ "title": "Obscure result" }]
        });

        let record = record_from_response("the query", &response).unwrap();
        assert_eq!(record.citations, None);
        assert_eq!(record.year, None);
    }

    #[test]
    fn test_empty_results_is_an_error() {
        let response = json!({ "organic_results": [] });
        assert!(matches!(
            record_from_response("q", &response),
            Err(ScholarError::NoResults(_))
        ));

        let response = json!({ "search_metadata": {} });
        assert!(matches!(
            record_from_response("q", &response),
            Err(ScholarError::ParseError(_))
        ));
    }
}
