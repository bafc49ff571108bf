//! The LaTeX `longtable` writer.
//!
//! The layout reproduces the published table: fixed column widths through
//! the `R{...}`/`L{...}` column types, the caption attached to the table,
//! bold `\scriptsize` headers emitted twice (once for the first page, once
//! for subsequent pages), a `\midrule` before every body row, and all cells
//! except the `\cite` reference wrapped in `\small{...}`. The document
//! preamble the table needs is exposed as [`PACKAGES_AND_COMMANDS`]; it is
//! printed on request, never written into the table file.

use super::{Column, TableRow};

/// What the including document's preamble must carry for the table to
/// compile.
pub const PACKAGES_AND_COMMANDS: &str = r##"% packages & commands used by "Standards and tools ordered by estimated influence" table
\usepackage{booktabs}
\usepackage{array}
\usepackage{longtable}
\usepackage{import}
% see: https://tex.stackexchange.com/a/119561
\newcolumntype{R}[1]{>{\raggedleft\arraybackslash}p{#1}}
\newcolumntype{L}[1]{>{\raggedright\arraybackslash}p{#1}}
"##;

const CAPTION: &str = r"Standards and tools ordered by estimated influence.
The standards and tools recommended in this paper are ordered by their annual citation rates for their
primary publications, as measured by Google Scholar.
To provide a measure of influence focused on biomedical research PubMed citations per year are shown when available.
The Type column categorizes each tool by its overall purpose.\\
\\
Reproducible methods were used to obtain these data.
Two hand-curated tables were input: a list of the standards and tools containing the titles of the primary publications, and a LaTeX bibliography containing the papers.
Each paper's publication year and Google Scholar citation counts were obtained via a Google Scholar API.
PubMed citation counts were obtained via the PubMed API \cite{sayers2010general}.
These analyses can be reproduced by executing a single command.
The hand-curated tables and source code for this analysis are available at \cite{GoldbergReproToolsAnalysis}.";

/// Render the ranked rows as a complete `longtable` environment.
pub fn render(rows: &[TableRow], columns: &[Column]) -> String {
    let mut table = String::new();

    table.push_str("\n\\begin{longtable}");
    table.push('{');
    for column in columns {
        table.push_str(column.alignment());
    }
    table.push_str("}\n");
    table.push_str(&format!("\\caption{{{}}}\\\\\n", CAPTION));

    let header = header_lines(columns);
    table.push_str("% header for first page\n");
    table.push_str(&header);
    table.push_str("\\endfirsthead\n");
    table.push_str("% same header for subsequent pages\n");
    table.push_str(&header);
    table.push_str("\\midrule\n");
    table.push_str("\\endhead\n");

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|&column| body_cell(row, column))
            .collect();
        table.push_str("\\midrule\n");
        table.push_str(&cells.join(" &"));
        table.push_str("\\\\\n");
    }

    table.push_str("\\bottomrule\\end{longtable}\n");
    table
}

fn header_lines(columns: &[Column]) -> String {
    let cells: Vec<String> = columns
        .iter()
        .map(|column| format!("\\textbf{{\\scriptsize{{{}}}}}", column.latex_header()))
        .collect();
    format!("\\toprule\n{}\\\\\n", cells.join(" &"))
}

fn body_cell(row: &TableRow, column: Column) -> String {
    let cell = match column {
        Column::Reference => row
            .bib_key
            .as_deref()
            .map(|key| format!("\\cite{{{}}}", key))
            .unwrap_or_default(),
        other => row.cell(other),
    };
    if column.shrink() {
        format!("\\small{{{}}}", cell)
    } else {
        cell
    }
}
