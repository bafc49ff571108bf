//! Environment preparation.
//!
//! `prepare` runs once before the first import: it checks that the SerpApi
//! key is configured, clones the survey-responses repository next to the
//! working directory, and verifies the hand-curated inputs are in place.

use crate::config::Config;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::info;

/// Where the survey responses live; cloned on first `prepare`.
pub const SURVEY_REPO_URL: &str = "https://github.com/KarrLab/paper_2018_curr_opin_sys_biol.git";
pub const SURVEY_REPO_DIR: &str = "paper_2018_curr_opin_sys_biol";

pub struct PrepareOptions {
    pub standards_file: PathBuf,
    pub bibliography_file: PathBuf,
    /// Where the survey repository is (or will be) checked out.
    pub survey_dir: PathBuf,
}

/// Check credentials, fetch the survey responses, and verify the inputs.
/// Prints `Prepare successful.` when everything is in place.
pub async fn run_prepare(config: &Config, options: &PrepareOptions) -> Result<()> {
    config.require_serp_api_key()?;

    clone_survey_repo(&options.survey_dir).await?;
    require_file(&options.standards_file, "curated standards table")?;
    require_file(&options.bibliography_file, "bibliography")?;

    println!("Prepare successful.");
    Ok(())
}

async fn clone_survey_repo(survey_dir: &Path) -> Result<()> {
    if survey_dir.exists() {
        info!(dir = %survey_dir.display(), "Survey repository already present, not cloning");
        return Ok(());
    }

    info!(url = SURVEY_REPO_URL, "Cloning survey repository");
    let output = Command::new("git")
        .arg("clone")
        .arg(SURVEY_REPO_URL)
        .arg(survey_dir)
        .output()
        .await
        .context("failed to run git; is it installed?")?;

    if !output.status.success() {
        bail!(
            "git clone {} failed: {}",
            SURVEY_REPO_URL,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.is_file() {
        bail!("{} not found at {}", what, path.display());
    }
    Ok(())
}
