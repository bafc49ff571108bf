// Standards Influence - reproduce the "standards and tools ordered by
// estimated influence" table from citation and survey data

pub mod bibliography;
pub mod cli;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod prepare;
pub mod pubmed;    // NCBI E-utilities (esearch, esummary, elink)
pub mod scholar;   // Google Scholar sources (SerpApi + offline mock)
pub mod spreadsheet;
pub mod survey;
pub mod table;

// Re-exports for convenience
pub use config::Config;
pub use models::CuratedStandard;
