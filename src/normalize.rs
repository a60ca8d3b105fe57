//! Name normalization for heading matching.
//!
//! Ability names arrive from the code-side catalog with straight apostrophes,
//! while the PDF-to-text conversion emits whichever curly quote the typesetter
//! used. Matching folds both sides to one representative character and builds
//! full-line regex patterns from escaped literals so a name is only ever
//! matched as an entire heading line, never as a substring of prose.

use anyhow::{Context, Result};
use regex::Regex;

/// Apostrophe variants the OCR output is known to mix.
const APOSTROPHES: [char; 3] = ['\'', '\u{2018}', '\u{2019}'];

/// Fold curly single quotes to the straight ASCII apostrophe.
///
/// Total over all strings; non-apostrophe characters pass through unchanged.
pub fn fold_apostrophes(name: &str) -> String {
    name.replace(['\u{2018}', '\u{2019}'], "'")
}

/// Compare two strings for equality up to apostrophe variance.
pub fn names_equal(a: &str, b: &str) -> bool {
    fold_apostrophes(a) == fold_apostrophes(b)
}

/// Build a regex matching a line consisting exactly of `name` after trimming.
///
/// The literal is regex-escaped, then every apostrophe position is widened to
/// a class accepting any known variant. `(?m)` anchors bind to `\n` only, so
/// "line" here means newline-delimited, matching the extractor's offset
/// arithmetic.
pub fn heading_pattern(name: &str) -> Result<Regex> {
    let mut literal = String::with_capacity(name.len() + 16);
    for ch in name.chars() {
        if APOSTROPHES.contains(&ch) {
            literal.push_str("['\u{2018}\u{2019}]");
        } else {
            literal.push_str(&regex::escape(&ch.to_string()));
        }
    }
    let pattern = format!(r"(?m)^[ \t]*{literal}[ \t]*\r?$");
    Regex::new(&pattern).with_context(|| format!("building heading pattern for '{name}'"))
}
