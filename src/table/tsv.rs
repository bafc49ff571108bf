//! The tab-separated writer.
//!
//! Same ranked rows and column set as the LaTeX table, without the markup:
//! the reference column carries the bare bibliography key and the survey
//! header a plain `%`.

use super::{Column, TableRow};
use anyhow::{Context, Result};
use csv::WriterBuilder;

/// Render the ranked rows as TSV with one header row.
pub fn render(rows: &[TableRow], columns: &[Column]) -> Result<String> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|column| column.tsv_header()))
        .context("failed to write TSV header")?;
    for row in rows {
        writer
            .write_record(columns.iter().map(|&column| row.cell(column)))
            .context("failed to write TSV row")?;
    }

    let bytes = writer.into_inner().context("failed to flush TSV output")?;
    String::from_utf8(bytes).context("TSV output was not UTF-8")
}
