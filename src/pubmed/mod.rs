//! NCBI PubMed access via the E-utilities API.

pub mod eutils;

pub use eutils::{EutilsClient, EutilsError, PubSummary};
