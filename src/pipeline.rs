//! The import pipeline.
//!
//! Enrichment runs as a fixed sequence of stages over the curated rows,
//! one title at a time:
//!
//! 1. check every curated title against the bibliography,
//! 2. attach bibliography keys,
//! 3. attach survey adoption rates,
//! 4. attach Google Scholar citations and publication years,
//! 5. attach PubMed ids,
//! 6. attach PubMed citation counts,
//! 7. rank the rows and write both output files.
//!
//! Per-title misses and API failures are logged and leave blank cells;
//! only unusable inputs abort the run.

use crate::bibliography::Bibliography;
use crate::config::Config;
use crate::models::{self, CuratedStandard};
use crate::pubmed::EutilsClient;
use crate::scholar::{self, ScholarSource};
use crate::spreadsheet;
use crate::survey;
use crate::table::{self, Column};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const LATEX_OUTPUT_FILE: &str = "evaluated_standards.tex";
pub const TSV_OUTPUT_FILE: &str = "evaluated_standards.tsv";

pub struct ImportOptions {
    pub standards_file: PathBuf,
    pub bibliography_file: PathBuf,
    pub survey_file: PathBuf,
    pub out_dir: PathBuf,
    /// Use the deterministic offline Scholar source.
    pub mock: bool,
    /// Reference date for the citations-per-year denominators.
    pub as_of: NaiveDate,
    pub drop_columns: Vec<Column>,
}

/// Run the import: enrich the curated standards and write the ranked
/// tables into `out_dir`.
pub async fn run_import(config: &Config, options: &ImportOptions) -> Result<()> {
    let bibliography = Bibliography::load(&options.bibliography_file)?;
    let mut standards = models::load_curated_standards(&options.standards_file)?;
    info!(
        standards = standards.len(),
        entries = bibliography.len(),
        "Curated standards and bibliography loaded"
    );

    check_titles(&standards, &bibliography);
    attach_bib_keys(&mut standards, &bibliography);
    attach_survey_adoption(&mut standards, options)?;

    let source = scholar::scholar_source(options.mock, config.serp_api_key.as_deref())?;
    attach_scholar_data(&mut standards, source.as_ref()).await;

    let eutils = EutilsClient::new(
        config.eutils_base_url.as_deref(),
        config.ncbi_api_key.as_deref(),
        config.contact_email.as_deref(),
    );
    attach_pm_ids(&mut standards, &eutils).await;
    attach_pm_citations(&mut standards, &eutils).await;

    write_tables(&standards, options).await
}

/// Stage 1: report curated titles the bibliography does not carry.
fn check_titles(standards: &[CuratedStandard], bibliography: &Bibliography) {
    let missing = bibliography.check_titles(standards.iter().map(|s| s.title.as_str()));
    if missing.is_empty() {
        info!(
            titles = standards.len(),
            bibliography = %bibliography.path().display(),
            "All titles found in the bibliography"
        );
    } else {
        warn!(?missing, "Titles missing from the bibliography");
    }
}

/// Stage 2: attach the bibliography entry keys used for `\cite`.
fn attach_bib_keys(standards: &mut [CuratedStandard], bibliography: &Bibliography) {
    let mut missing = Vec::new();
    for standard in standards.iter_mut() {
        match bibliography.entry_key_for_title(&standard.title) {
            Some(key) => standard.bib_key = Some(key.to_string()),
            None => missing.push(standard.title.clone()),
        }
    }
    if missing.is_empty() {
        info!("All references have bibliography keys");
    } else {
        warn!(?missing, "Titles missing bibliography keys");
    }
}

/// Stage 3: attach fractional survey adoption by standard name.
fn attach_survey_adoption(standards: &mut [CuratedStandard], options: &ImportOptions) -> Result<()> {
    let responses = spreadsheet::load_records(&options.survey_file).with_context(|| {
        format!(
            "failed to load survey responses from {}",
            options.survey_file.display()
        )
    })?;
    let fractions = survey::adoption_fractions(&responses);

    let mut matched = 0usize;
    for standard in standards.iter_mut() {
        if let Some(fraction) = fractions.get(&standard.name) {
            standard.survey_adoption = Some(*fraction);
            matched += 1;
        }
    }
    info!(
        respondents = responses.len(),
        matched, "Survey data incorporated"
    );
    Ok(())
}

/// Stage 4: attach Google Scholar citation counts and publication years.
/// A row is only enriched when the lookup yields both; partial or failed
/// lookups are reported and leave the row blank.
async fn attach_scholar_data(standards: &mut [CuratedStandard], source: &dyn ScholarSource) {
    let mut missing = Vec::new();
    for standard in standards.iter_mut() {
        match source.lookup(&standard.title).await {
            Ok(record) => {
                debug!(query = %standard.title, result = %record.title, "Scholar result");
                match (record.citations, record.year) {
                    (Some(citations), Some(year)) => {
                        standard.gs_citations = Some(citations);
                        standard.pub_year = Some(year);
                    }
                    _ => missing.push(standard.title.clone()),
                }
            }
            Err(e) => {
                warn!(title = %standard.title, error = %e, "Scholar lookup failed");
                missing.push(standard.title.clone());
            }
        }
    }
    if missing.is_empty() {
        info!("All references found on Google Scholar");
    } else {
        warn!(?missing, "Titles not found on Google Scholar");
    }
}

/// Stage 5: attach PubMed ids.
async fn attach_pm_ids(standards: &mut [CuratedStandard], eutils: &EutilsClient) {
    let mut missing = Vec::new();
    for standard in standards.iter_mut() {
        match eutils.pm_id_for_title(&standard.title).await {
            Ok(Some(pm_id)) => standard.pm_id = Some(pm_id),
            Ok(None) => missing.push(standard.title.clone()),
            Err(e) => {
                warn!(title = %standard.title, error = %e, "PubMed id lookup failed");
                missing.push(standard.title.clone());
            }
        }
    }
    if missing.is_empty() {
        info!("All references have PubMed ids");
    } else {
        warn!(?missing, "Titles missing PubMed ids");
    }
}

/// Stage 6: attach PubMed Central citation counts for rows with an id.
async fn attach_pm_citations(standards: &mut [CuratedStandard], eutils: &EutilsClient) {
    let mut missing = Vec::new();
    for standard in standards.iter_mut() {
        let Some(pm_id) = standard.pm_id else {
            continue;
        };
        match eutils.citation_count(pm_id).await {
            Ok(count) => standard.pm_citations = Some(count),
            Err(e) => {
                warn!(title = %standard.title, pm_id, error = %e, "PubMed citation lookup failed");
                missing.push(standard.title.clone());
            }
        }
    }
    if missing.is_empty() {
        info!("All references with PubMed ids have PubMed citations");
    } else {
        warn!(?missing, "Titles missing PubMed citations");
    }
}

/// Stage 7: rank the rows and write the LaTeX and TSV outputs.
async fn write_tables(standards: &[CuratedStandard], options: &ImportOptions) -> Result<()> {
    let columns = table::kept_columns(&options.drop_columns);
    let rows = table::build_rows(standards, options.as_of);

    let latex = table::latex::render(&rows, &columns);
    let tsv = table::tsv::render(&rows, &columns)?;

    tokio::fs::create_dir_all(&options.out_dir)
        .await
        .with_context(|| format!("failed to create {}", options.out_dir.display()))?;

    let latex_path = options.out_dir.join(LATEX_OUTPUT_FILE);
    tokio::fs::write(&latex_path, latex)
        .await
        .with_context(|| format!("failed to write {}", latex_path.display()))?;

    let tsv_path = options.out_dir.join(TSV_OUTPUT_FILE);
    tokio::fs::write(&tsv_path, tsv)
        .await
        .with_context(|| format!("failed to write {}", tsv_path.display()))?;

    info!(
        rows = rows.len(),
        latex = %latex_path.display(),
        tsv = %tsv_path.display(),
        "Wrote evaluated standards tables"
    );
    Ok(())
}
