//! BibTeX bibliography lookup.
//!
//! The bibliography ships with the repository as a hand-curated `.bib` file.
//! The import pipeline only needs one operation from it: given the title of a
//! primary publication, recover the entry key to cite in the LaTeX table.
//! Matching is exact after whitespace normalization, so titles may be wrapped
//! differently in the spreadsheet and the bibliography.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading a bibliography
#[derive(Debug, Error)]
pub enum BibliographyError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unterminated entry '{0}'")]
    UnterminatedEntry(String),

    #[error("unterminated value in entry '{0}'")]
    UnterminatedValue(String),
}

/// One `@type{key, ...}` database entry.
#[derive(Debug, Clone)]
pub struct Entry {
    pub key: String,
    pub entry_type: String,
    pub fields: HashMap<String, String>,
}

/// A parsed BibTeX database.
pub struct Bibliography {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl Bibliography {
    pub fn load(path: &Path) -> Result<Self, BibliographyError> {
        let text = std::fs::read_to_string(path).map_err(|source| BibliographyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            entries: parse_entries(&text)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry key for a publication title, if the bibliography has it.
    /// Titles are compared exactly after whitespace normalization.
    pub fn entry_key_for_title(&self, title: &str) -> Option<&str> {
        let wanted = normalize_whitespace(title);
        self.entries
            .iter()
            .find(|entry| {
                entry
                    .fields
                    .get("title")
                    .map(|t| normalize_whitespace(t) == wanted)
                    .unwrap_or(false)
            })
            .map(|entry| entry.key.as_str())
    }

    /// Every title from `titles` that has no entry in the bibliography.
    pub fn check_titles<'a>(&self, titles: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        titles
            .into_iter()
            .filter(|title| self.entry_key_for_title(title).is_none())
            .map(str::to_string)
            .collect()
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scan a BibTeX database into entries. `@comment`, `@preamble`, and
/// `@string` blocks are skipped, as is any text between entries. Field
/// values may be brace-delimited (with nested braces), quote-delimited,
/// or bare, and may be concatenated with `#`.
fn parse_entries(text: &str) -> Result<Vec<Entry>, BibliographyError> {
    let chars: Vec<char> = text.chars().collect();
    let mut entries = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if chars[pos] != '@' {
            pos += 1;
            continue;
        }
        pos += 1;

        let entry_type = read_identifier(&chars, &mut pos).to_lowercase();
        skip_whitespace(&chars, &mut pos);
        let close = match chars.get(pos) {
            Some('{') => '}',
            Some('(') => ')',
            // stray '@' in inter-entry text
            _ => continue,
        };
        let open = chars[pos];
        pos += 1;

        if matches!(entry_type.as_str(), "comment" | "preamble" | "string") {
            skip_balanced(&chars, &mut pos, open, close)
                .ok_or_else(|| BibliographyError::UnterminatedEntry(entry_type.clone()))?;
            continue;
        }

        let key = read_until_any(&chars, &mut pos, &[',', close])
            .ok_or_else(|| BibliographyError::UnterminatedEntry(entry_type.clone()))?
            .trim()
            .to_string();

        let mut fields = HashMap::new();
        loop {
            skip_whitespace(&chars, &mut pos);
            match chars.get(pos) {
                None => return Err(BibliographyError::UnterminatedEntry(key)),
                Some(&c) if c == close => {
                    pos += 1;
                    break;
                }
                Some(',') => {
                    pos += 1;
                    continue;
                }
                Some(_) => {}
            }

            let name = read_until(&chars, &mut pos, '=')
                .ok_or_else(|| BibliographyError::UnterminatedEntry(key.clone()))?
                .trim()
                .to_lowercase();
            pos += 1; // consume '='
            let value = read_value(&chars, &mut pos, close, &key)?;
            fields.insert(name, value);
        }

        entries.push(Entry {
            key,
            entry_type,
            fields,
        });
    }

    Ok(entries)
}

fn read_identifier(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && (chars[*pos].is_alphanumeric() || chars[*pos] == '_') {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn skip_whitespace(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

fn read_until(chars: &[char], pos: &mut usize, stop: char) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() {
        if chars[*pos] == stop {
            return Some(chars[start..*pos].iter().collect());
        }
        *pos += 1;
    }
    None
}

/// Like `read_until`, but stops before (without consuming) any of `stops`.
fn read_until_any(chars: &[char], pos: &mut usize, stops: &[char]) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() {
        if stops.contains(&chars[*pos]) {
            return Some(chars[start..*pos].iter().collect());
        }
        *pos += 1;
    }
    None
}

/// Skip past a balanced `open`..`close` block; `pos` starts just inside it.
fn skip_balanced(chars: &[char], pos: &mut usize, open: char, close: char) -> Option<()> {
    let mut depth = 1;
    while *pos < chars.len() {
        let c = chars[*pos];
        *pos += 1;
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(());
            }
        }
    }
    None
}

/// Read one field value: `#`-concatenated brace-delimited, quote-delimited,
/// or bare tokens, ending before the `,` or the entry's closing delimiter.
fn read_value(
    chars: &[char],
    pos: &mut usize,
    entry_close: char,
    entry_key: &str,
) -> Result<String, BibliographyError> {
    let mut value = String::new();
    loop {
        skip_whitespace(chars, pos);
        match chars.get(*pos) {
            Some('{') => {
                *pos += 1;
                value.push_str(&read_braced(chars, pos).ok_or_else(|| {
                    BibliographyError::UnterminatedValue(entry_key.to_string())
                })?);
            }
            Some('"') => {
                *pos += 1;
                value.push_str(&read_quoted(chars, pos).ok_or_else(|| {
                    BibliographyError::UnterminatedValue(entry_key.to_string())
                })?);
            }
            Some(_) => {
                // bare token: a number or an @string macro name
                while *pos < chars.len() {
                    let c = chars[*pos];
                    if c == ',' || c == entry_close || c == '#' || c.is_whitespace() {
                        break;
                    }
                    value.push(c);
                    *pos += 1;
                }
            }
            None => return Err(BibliographyError::UnterminatedValue(entry_key.to_string())),
        }

        skip_whitespace(chars, pos);
        if chars.get(*pos) == Some(&'#') {
            *pos += 1;
            continue;
        }
        return Ok(value);
    }
}

/// Collect a brace-delimited value, keeping nested braces; `pos` starts just
/// inside the opening brace.
fn read_braced(chars: &[char], pos: &mut usize) -> Option<String> {
    let mut depth = 1;
    let mut value = String::new();
    while *pos < chars.len() {
        let c = chars[*pos];
        *pos += 1;
        match c {
            '{' => {
                depth += 1;
                value.push(c);
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(value);
                }
                value.push(c);
            }
            _ => value.push(c),
        }
    }
    None
}

/// Collect a quote-delimited value; quotes inside braces do not terminate it.
fn read_quoted(chars: &[char], pos: &mut usize) -> Option<String> {
    let mut depth = 0;
    let mut value = String::new();
    while *pos < chars.len() {
        let c = chars[*pos];
        *pos += 1;
        match c {
            '{' => {
                depth += 1;
                value.push(c);
            }
            '}' => {
                depth -= 1;
                value.push(c);
            }
            '"' if depth == 0 => return Some(value),
            _ => value.push(c),
        }
    }
    None
}
