//! The curated standards table and its enrichment fields.

use crate::spreadsheet;
use anyhow::{Context, Result};
use std::path::Path;

// Column names of the hand-curated input table.
pub const STANDARD_COLUMN: &str = "Standard / tool";
pub const TYPE_COLUMN: &str = "Type";
pub const TITLE_COLUMN: &str = "Title";

/// One standard or tool from the hand-curated table, plus the fields the
/// import pipeline fills in. Every enrichment is optional: a standard that
/// cannot be found in the bibliography, the survey, Google Scholar, or
/// PubMed keeps `None` there and renders as a blank cell.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CuratedStandard {
    /// Short name, e.g. "SBML".
    pub name: String,
    /// Category of the standard or tool.
    pub kind: String,
    /// Title of its primary publication.
    pub title: String,
    /// BibTeX entry key for the primary publication.
    pub bib_key: Option<String>,
    /// Fraction of survey respondents who reported using it.
    pub survey_adoption: Option<f64>,
    /// Google Scholar citation count of the primary publication.
    pub gs_citations: Option<u64>,
    /// Publication year, taken from the Google Scholar result.
    pub pub_year: Option<i32>,
    /// PubMed id of the primary publication.
    pub pm_id: Option<u64>,
    /// PubMed Central citation count of the primary publication.
    pub pm_citations: Option<u64>,
}

impl CuratedStandard {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            title: title.into(),
            bib_key: None,
            survey_adoption: None,
            gs_citations: None,
            pub_year: None,
            pm_id: None,
            pm_citations: None,
        }
    }
}

/// Load the curated standards from the first worksheet of `path`.
/// The worksheet must carry the `Standard / tool`, `Type`, and `Title`
/// columns; other columns are ignored.
pub fn load_curated_standards(path: &Path) -> Result<Vec<CuratedStandard>> {
    let records = spreadsheet::load_records(path)
        .with_context(|| format!("failed to load curated standards from {}", path.display()))?;

    let mut standards = Vec::with_capacity(records.len());
    for record in &records {
        let column = |name: &str| -> Result<String> {
            record.get(name).cloned().with_context(|| {
                format!("column '{}' missing from {}", name, path.display())
            })
        };
        standards.push(CuratedStandard::new(
            column(STANDARD_COLUMN)?,
            column(TYPE_COLUMN)?,
            column(TITLE_COLUMN)?,
        ));
    }
    Ok(standards)
}
