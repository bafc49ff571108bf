use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Default location of the credentials file, looked up in the directory the
/// commands run in (the `keys.py` of the original analysis).
pub const DEFAULT_KEYS_FILE: &str = "keys.toml";

/// Credentials and service settings.
///
/// Loaded from `keys.toml` with environment variables layered on top, so
/// `SERP_API_KEY=... standards-influence import` works without a file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// SerpApi private key. Required for live Google Scholar searches,
    /// which are billable; `import --mock` runs without it.
    #[serde(default)]
    pub serp_api_key: Option<String>,
    /// NCBI E-utilities key. Optional; raises the request pace from one
    /// per 2 s to ten per second.
    #[serde(default)]
    pub ncbi_api_key: Option<String>,
    /// Contact email sent with every E-utilities request, per NCBI usage
    /// policy. Optional but recommended.
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Alternate E-utilities endpoint. Tests point this at a local server.
    #[serde(default)]
    pub eutils_base_url: Option<String>,
}

impl Config {
    pub fn load(keys_file: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::from(keys_file).required(false))
            .add_source(config::Environment::default())
            .build()
            .with_context(|| format!("failed to read {}", keys_file.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid settings in {}", keys_file.display()))
    }

    /// The SerpApi key, or an error telling the user where to put one.
    pub fn require_serp_api_key(&self) -> Result<&str> {
        match self.serp_api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => anyhow::bail!(
                "serp_api_key must be set in {} (or SERP_API_KEY in the environment); \
                 see keys.toml.example",
                DEFAULT_KEYS_FILE
            ),
        }
    }
}
