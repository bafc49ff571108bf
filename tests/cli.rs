mod common;

use common::{TestEnv, MARKUP_TITLE, TINY_TITLE};
use mockito::Matcher;
use predicates::str::contains;
use standards_influence::pipeline::{LATEX_OUTPUT_FILE, TSV_OUTPUT_FILE};
use standards_influence::prepare::SURVEY_REPO_DIR;
use std::fs;

#[test]
fn import_mock_writes_ranked_tables() {
    let env = TestEnv::new();
    env.import_cmd().assert().success();

    // the longer title gets more offline citations, so SBML ranks first;
    // PubMed cells stay blank because the endpoint is unreachable
    let tsv = env.read_output(TSV_OUTPUT_FILE);
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Standard / tool\tType of standard / tool\tMost cited paper\tPaper year\tPubMed (cites / yr)\tScholar (cites / yr)\tUse in survey (%)",
            "SBML\tModel format\tmarkup2004\t2004\t\t3.0\t100.0",
            "Short\tTool\ttiny2001\t2001\t\t0.5\t50.0",
        ]
    );

    let latex = env.read_output(LATEX_OUTPUT_FILE);
    assert!(latex.contains("\\begin{longtable}{L{2.2cm}L{4cm}L{1cm}L{0.8cm}R{1.1cm}R{1cm}R{1cm}}"));
    assert!(latex.contains("\\cite{markup2004}"));
    assert!(latex.contains("\\small{SBML}"));
    assert!(latex.ends_with("\\bottomrule\\end{longtable}\n"));
}

#[test]
fn import_reruns_are_byte_identical() {
    let env = TestEnv::new();
    env.import_cmd().assert().success();
    let first_latex = env.read_output(LATEX_OUTPUT_FILE);
    let first_tsv = env.read_output(TSV_OUTPUT_FILE);

    env.import_cmd().assert().success();
    assert_eq!(env.read_output(LATEX_OUTPUT_FILE), first_latex);
    assert_eq!(env.read_output(TSV_OUTPUT_FILE), first_tsv);
}

#[test]
fn import_drop_column_removes_from_both_outputs() {
    let env = TestEnv::new();
    env.import_cmd()
        .args(["--drop-column", "survey-use"])
        .assert()
        .success();

    let tsv = env.read_output(TSV_OUTPUT_FILE);
    assert!(!tsv.contains("Use in survey"));
    assert!(tsv.lines().next().unwrap().ends_with("Scholar (cites / yr)"));

    let latex = env.read_output(LATEX_OUTPUT_FILE);
    assert!(!latex.contains("Use in survey"));
    assert!(latex.contains("\\begin{longtable}{L{2.2cm}L{4cm}L{1cm}L{0.8cm}R{1.1cm}R{1cm}}"));
}

#[test]
fn import_print_preamble_goes_to_stdout() {
    let env = TestEnv::new();
    env.import_cmd()
        .arg("--print-preamble")
        .assert()
        .success()
        .stdout(contains("\\usepackage{longtable}"))
        .stdout(contains("\\newcolumntype{R}[1]"));
}

#[test]
fn import_without_serp_key_fails_fast() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "import",
            "--standards",
            "standards.csv",
            "--bibliography",
            "refs.bib",
            "--survey",
            "survey.tsv",
        ])
        .assert()
        .failure()
        .stderr(contains("serp_api_key"));

    assert!(!env.dir.join(TSV_OUTPUT_FILE).exists());
}

#[test]
fn import_fills_pubmed_rates_from_a_local_server() {
    let mut server = mockito::Server::new();
    let esearch = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("db".into(), "pubmed".into()),
            Matcher::UrlEncoded("term".into(), MARKUP_TITLE.into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(r#"{"esearchresult": {"idlist": ["12611808"]}}"#)
        .create();
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::UrlEncoded("term".into(), TINY_TITLE.into()))
        .with_header("content-type", "application/json")
        .with_body(r#"{"esearchresult": {"idlist": []}}"#)
        .create();
    let elink = server
        .mock("GET", "/elink.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("linkname".into(), "pubmed_pmc_refs".into()),
            Matcher::UrlEncoded("id".into(), "12611808".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"linksets": [{"dbfrom": "pubmed", "ids": [12611808], "linksetdbs": [
                {"dbto": "pmc", "linkname": "pubmed_pmc_refs", "links": [1, 2, 3, 4, 5, 6, 7, 8]}
            ]}]}"#,
        )
        .create();

    let env = TestEnv::new();
    env.import_cmd()
        .env("EUTILS_BASE_URL", server.url())
        .assert()
        .success();

    esearch.assert();
    elink.assert();

    // 8 PubMed Central citations over 16.5 years
    let tsv = env.read_output(TSV_OUTPUT_FILE);
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines[1], "SBML\tModel format\tmarkup2004\t2004\t0.5\t3.0\t100.0");
    assert_eq!(lines[2], "Short\tTool\ttiny2001\t2001\t\t0.5\t50.0");
}

#[test]
fn prepare_reports_success_when_inputs_are_in_place() {
    let env = TestEnv::new();
    // a present checkout skips the clone
    fs::create_dir(env.dir.join(SURVEY_REPO_DIR)).unwrap();

    env.cmd()
        .env("SERP_API_KEY", "test-serp-key")
        .args(["prepare", "--standards", "standards.csv", "--bibliography", "refs.bib"])
        .assert()
        .success()
        .stdout(contains("Prepare successful."));
}

#[test]
fn prepare_names_a_missing_input() {
    let env = TestEnv::new();
    fs::create_dir(env.dir.join(SURVEY_REPO_DIR)).unwrap();

    env.cmd()
        .env("SERP_API_KEY", "test-serp-key")
        .args(["prepare", "--standards", "absent.csv", "--bibliography", "refs.bib"])
        .assert()
        .failure()
        .stderr(contains("absent.csv"));
}
