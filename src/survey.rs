//! Adoption rates from the community survey.
//!
//! The survey spreadsheet has one column per question and one row per
//! respondent; multi-select answers are `;`-separated within a cell. Three
//! questions asked which tools respondents use, and a tool's adoption is the
//! fraction of respondents who named it among those who answered the
//! question at all. A tool named under several questions takes its largest
//! fraction.

use crate::spreadsheet::Record;
use std::collections::HashMap;

/// The survey questions whose answers name tools and standards.
pub const QUESTIONS: [&str; 3] = [
    "If you use models in your research, which tools do you most frequently use to build and/or simulate models?",
    "If you use models in your research, which resources do you most frequently use to distribute models?",
    "If you use models in your research, which languages do you most frequently use to represent models?",
];

/// Fractional adoption per tool across the three tool questions.
/// A respondent counts toward a question's denominator only if their cell
/// for it is non-empty.
pub fn adoption_fractions(responses: &[Record]) -> HashMap<String, f64> {
    let mut fractions: HashMap<String, f64> = HashMap::new();

    for question in QUESTIONS {
        let mut uses: HashMap<&str, usize> = HashMap::new();
        let mut answered = 0usize;

        for response in responses {
            let cell = match response.get(question) {
                Some(cell) if !cell.is_empty() => cell,
                _ => continue,
            };
            answered += 1;
            for tool in cell.split(';') {
                let tool = tool.trim();
                if !tool.is_empty() {
                    *uses.entry(tool).or_default() += 1;
                }
            }
        }

        if answered == 0 {
            continue;
        }
        for (tool, count) in uses {
            let fraction = count as f64 / answered as f64;
            let entry = fractions.entry(tool.to_string()).or_insert(0.0);
            if fraction > *entry {
                *entry = fraction;
            }
        }
    }

    fractions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(cells: &[(&str, &str)]) -> Record {
        cells
            .iter()
            .map(|(question, answer)| (question.to_string(), answer.to_string()))
            .collect()
    }

    #[test]
    fn test_blank_cells_do_not_count_toward_denominator() {
        let responses = vec![
            response(&[(QUESTIONS[0], "COPASI;SBML")]),
            response(&[(QUESTIONS[0], "COPASI")]),
            response(&[(QUESTIONS[0], "")]),
        ];

        let fractions = adoption_fractions(&responses);
        assert_eq!(fractions["COPASI"], 1.0);
        assert_eq!(fractions["SBML"], 0.5);
    }

    #[test]
    fn test_tool_under_several_questions_takes_maximum() {
        let responses = vec![
            response(&[(QUESTIONS[0], "SBML"), (QUESTIONS[2], "SBML")]),
            response(&[(QUESTIONS[0], "COPASI"), (QUESTIONS[2], "SBML")]),
            response(&[(QUESTIONS[0], "COPASI"), (QUESTIONS[2], "CellML")]),
            response(&[(QUESTIONS[0], "COPASI")]),
        ];

        let fractions = adoption_fractions(&responses);
        // 1/4 under the build question, 2/3 under the languages question
        assert_eq!(fractions["SBML"], 2.0 / 3.0);
        assert_eq!(fractions["COPASI"], 0.75);
    }

    #[test]
    fn test_multi_select_tokens_are_trimmed() {
        let responses = vec![response(&[(QUESTIONS[1], "BioModels; GitHub ;")])];

        let fractions = adoption_fractions(&responses);
        assert_eq!(fractions["BioModels"], 1.0);
        assert_eq!(fractions["GitHub"], 1.0);
        assert_eq!(fractions.len(), 2);
    }

    #[test]
    fn test_unrelated_columns_are_ignored() {
        let responses = vec![response(&[("Timestamp", "2018-01-05"), (QUESTIONS[0], "VCell")])];

        let fractions = adoption_fractions(&responses);
        assert_eq!(fractions.len(), 1);
        assert_eq!(fractions["VCell"], 1.0);
    }
}
