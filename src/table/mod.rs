//! Assembly and ranking of the output table rows.
//!
//! Both writers (LaTeX and TSV) render the same ranked rows: one per
//! curated standard, ordered by descending Google Scholar citations per
//! year. Citation rates divide a citation count by the publication age in
//! fractional years at the reference date, so a fixed `--as-of` date pins
//! the output byte-for-byte.

pub mod latex;
pub mod tsv;

use crate::models::CuratedStandard;
use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use tracing::warn;

/// The output columns, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Column {
    Standard,
    Type,
    Reference,
    Year,
    PubmedRate,
    ScholarRate,
    SurveyUse,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Standard,
        Column::Type,
        Column::Reference,
        Column::Year,
        Column::PubmedRate,
        Column::ScholarRate,
        Column::SurveyUse,
    ];

    /// Header text in the LaTeX table.
    pub fn latex_header(self) -> &'static str {
        match self {
            Column::Standard => "Standard / tool",
            Column::Type => "Type of standard / tool",
            Column::Reference => "Most cited paper",
            Column::Year => "Paper year",
            Column::PubmedRate => "PubMed (cites / yr)",
            Column::ScholarRate => "Scholar (cites / yr)",
            Column::SurveyUse => r"Use in survey (\%)",
        }
    }

    /// Header text in the TSV output; only the survey column differs.
    pub fn tsv_header(self) -> &'static str {
        match self {
            Column::SurveyUse => "Use in survey (%)",
            other => other.latex_header(),
        }
    }

    /// LaTeX column type: ragged-right or ragged-left at a fixed width.
    pub fn alignment(self) -> &'static str {
        match self {
            Column::Standard => "L{2.2cm}",
            Column::Type => "L{4cm}",
            Column::Reference => "L{1cm}",
            Column::Year => "L{0.8cm}",
            Column::PubmedRate => "R{1.1cm}",
            Column::ScholarRate => "R{1cm}",
            Column::SurveyUse => "R{1cm}",
        }
    }

    /// Whether body cells are wrapped in `\small{...}`; the reference
    /// column keeps its `\cite` at text size.
    pub fn shrink(self) -> bool {
        !matches!(self, Column::Reference)
    }
}

/// The columns left after `--drop-column`, in table order.
pub fn kept_columns(dropped: &[Column]) -> Vec<Column> {
    Column::ALL
        .iter()
        .copied()
        .filter(|column| !dropped.contains(column))
        .collect()
}

/// One ranked output row. Metric cells stay numeric here; the writers
/// format them.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub standard: String,
    pub kind: String,
    pub bib_key: Option<String>,
    pub year: Option<i32>,
    pub pubmed_rate: Option<f64>,
    pub scholar_rate: Option<f64>,
    pub survey_pct: Option<f64>,
}

impl TableRow {
    /// The plain-text cell for a column: rates and percentages to one
    /// decimal, blanks for missing enrichments, the bare bibliography key
    /// for the reference column.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Standard => self.standard.clone(),
            Column::Type => self.kind.clone(),
            Column::Reference => self.bib_key.clone().unwrap_or_default(),
            Column::Year => self.year.map(|y| y.to_string()).unwrap_or_default(),
            Column::PubmedRate => format_rate(self.pubmed_rate),
            Column::ScholarRate => format_rate(self.scholar_rate),
            Column::SurveyUse => format_rate(self.survey_pct),
        }
    }
}

fn format_rate(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_default()
}

/// Build the ranked rows for the output tables.
///
/// A row's citation rates and survey percentage are computed only when its
/// publication year is known; a row whose publication age at `as_of` is not
/// positive is dropped with a warning. Rows are ordered by descending
/// Scholar citations per year (compared at the printed one-decimal
/// precision), rows without a Scholar rate last, ties broken by standard
/// name so re-runs are byte-stable.
pub fn build_rows(standards: &[CuratedStandard], as_of: NaiveDate) -> Vec<TableRow> {
    let current_year = year_fraction(as_of);

    let mut rows = Vec::new();
    for standard in standards {
        let mut row = TableRow {
            standard: standard.name.clone(),
            kind: standard.kind.clone(),
            bib_key: standard.bib_key.clone(),
            year: None,
            pubmed_rate: None,
            scholar_rate: None,
            survey_pct: None,
        };

        if let Some(year) = standard.pub_year {
            let age = current_year - year as f64;
            if age <= 0.0 {
                warn!(title = %standard.title, age, "publication age is not positive, skipping row");
                continue;
            }
            row.year = Some(year);
            row.pubmed_rate = standard.pm_citations.map(|c| c as f64 / age);
            row.scholar_rate = standard.gs_citations.map(|c| c as f64 / age);
            row.survey_pct = standard.survey_adoption.map(|f| f * 100.0);
        }

        rows.push(row);
    }

    rows.sort_by(|a, b| {
        let rate_a = a.scholar_rate.map(round1).unwrap_or(f64::NEG_INFINITY);
        let rate_b = b.scholar_rate.map(round1).unwrap_or(f64::NEG_INFINITY);
        rate_b
            .total_cmp(&rate_a)
            .then_with(|| a.standard.cmp(&b.standard))
    });
    rows
}

// Rows are compared at the precision the table prints.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A date as a fractional year: the year plus the elapsed fraction of it.
pub fn year_fraction(date: NaiveDate) -> f64 {
    let year_length = if date.leap_year() { 366.0 } else { 365.0 };
    date.year() as f64 + date.ordinal0() as f64 / year_length
}
