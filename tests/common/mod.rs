use assert_cmd::Command;
use standards_influence::survey::QUESTIONS;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Title lengths drive the offline Scholar results: 49 characters mean 49
/// citations and year 2004, 10 mean 10 citations and year 2001.
pub const MARKUP_TITLE: &str = "A markup language title padded to fifty chars!!!!";
pub const TINY_TITLE: &str = "Tiny title";

/// An isolated working directory holding curated fixtures, with
/// credentials scrubbed from the environment.
pub struct TestEnv {
    _tmp: TempDir,
    pub dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let dir = tmp.path().to_path_buf();

        fs::write(
            dir.join("standards.csv"),
            format!(
                "Standard / tool,Type,Title\nSBML,Model format,{}\nShort,Tool,{}\n",
                MARKUP_TITLE, TINY_TITLE
            ),
        )
        .expect("write standards fixture");

        fs::write(
            dir.join("refs.bib"),
            format!(
                "@article{{markup2004,\n  title = {{{}}},\n}}\n\n@article{{tiny2001,\n  title = {{{}}},\n}}\n",
                MARKUP_TITLE, TINY_TITLE
            ),
        )
        .expect("write bibliography fixture");

        // one question column; SBML named by both respondents, Short by one
        fs::write(
            dir.join("survey.tsv"),
            format!("{}\nSBML;Short\nSBML\n", QUESTIONS[0]),
        )
        .expect("write survey fixture");

        Self { _tmp: tmp, dir }
    }

    /// The binary in the fixture directory, with credentials scrubbed and
    /// E-utilities pointed at a closed local port so nothing reaches the
    /// real services.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("standards-influence").unwrap();
        cmd.current_dir(&self.dir)
            .env_remove("SERP_API_KEY")
            .env_remove("CONTACT_EMAIL")
            // an api key keeps E-utilities pacing at one request per 100 ms
            .env("NCBI_API_KEY", "test-key")
            .env("EUTILS_BASE_URL", "http://127.0.0.1:9");
        cmd
    }

    /// `import` against the fixtures, offline and with a pinned date.
    pub fn import_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.args([
            "import",
            "--mock",
            "--as-of",
            "2020-07-01",
            "--standards",
            "standards.csv",
            "--bibliography",
            "refs.bib",
            "--survey",
            "survey.tsv",
        ]);
        cmd
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.dir.join(name)).expect("read output file")
    }
}
