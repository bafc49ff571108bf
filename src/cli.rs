//! Command-line surface: `prepare`, then `import`.

use crate::config::DEFAULT_KEYS_FILE;
use crate::table::Column;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_STANDARDS_FILE: &str = "data/curated_standards.csv";
pub const DEFAULT_BIBLIOGRAPHY_FILE: &str = "data/bibliography.bib";
pub const DEFAULT_SURVEY_FILE: &str = "paper_2018_curr_opin_sys_biol/survey_responses-edited2.xlsx";

#[derive(Parser, Debug)]
#[command(
    name = "standards-influence",
    version,
    about = "Estimate the relative influence of modeling standards and tools from citation and survey data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check credentials, fetch the survey responses, and verify the inputs
    Prepare {
        /// Credentials file
        #[arg(long, default_value = DEFAULT_KEYS_FILE)]
        keys: PathBuf,
        /// Hand-curated standards table
        #[arg(long, default_value = DEFAULT_STANDARDS_FILE)]
        standards: PathBuf,
        /// Hand-curated BibTeX bibliography
        #[arg(long, default_value = DEFAULT_BIBLIOGRAPHY_FILE)]
        bibliography: PathBuf,
    },
    /// Enrich the curated standards and write the ranked tables
    Import {
        /// Credentials file
        #[arg(long, default_value = DEFAULT_KEYS_FILE)]
        keys: PathBuf,
        /// Hand-curated standards table
        #[arg(long, default_value = DEFAULT_STANDARDS_FILE)]
        standards: PathBuf,
        /// Hand-curated BibTeX bibliography
        #[arg(long, default_value = DEFAULT_BIBLIOGRAPHY_FILE)]
        bibliography: PathBuf,
        /// Survey responses spreadsheet
        #[arg(long, default_value = DEFAULT_SURVEY_FILE)]
        survey: PathBuf,
        /// Directory receiving both output files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Use deterministic offline Scholar results (no billable searches)
        #[arg(long)]
        mock: bool,
        /// Reference date for citations-per-year; defaults to today
        #[arg(long, value_name = "YYYY-MM-DD")]
        as_of: Option<NaiveDate>,
        /// Omit a column from both outputs (repeatable)
        #[arg(long, value_enum, value_name = "COLUMN")]
        drop_column: Vec<Column>,
        /// After writing, print the LaTeX preamble block the table requires
        #[arg(long)]
        print_preamble: bool,
    },
}
