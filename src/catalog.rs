//! Ability catalog and PDF name mapping.
//!
//! The catalog is the authoritative list of ability names shipped with the
//! game data, plus an optional mapping to the exact string form each name
//! takes inside the scraped rulebook text. Both are read-only configuration
//! for an extraction run; absent mapping keys imply the PDF uses the
//! authoritative name verbatim.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
/// Authoritative ability names plus their PDF-side spellings.
pub struct AbilityCatalog {
    names: Vec<String>,
    mapping: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One ability in the order its heading was observed in the source text.
///
/// `position` is the scan-order index; `line_number` is the 0-based source
/// line of the heading occurrence, kept for operator review output.
pub struct OrderedAbilityRef {
    #[serde(rename = "codeName")]
    pub code_name: String,
    #[serde(rename = "pdfName")]
    pub pdf_name: String,
    pub position: usize,
    #[serde(rename = "lineNumber")]
    pub line_number: usize,
}

impl AbilityCatalog {
    /// Build a catalog from an explicit name list and mapping.
    ///
    /// Duplicate names are rejected up front; the extractor's "first match
    /// after previous" rule cannot disambiguate two entries that share a
    /// heading string.
    pub fn new(names: Vec<String>, mapping: BTreeMap<String, String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for name in &names {
            if name.trim().is_empty() {
                bail!("ability name list contains an empty entry");
            }
            if !seen.insert(name.as_str()) {
                bail!("duplicate ability name in catalog: '{name}'");
            }
        }
        for key in mapping.keys() {
            if !seen.contains(key.as_str()) {
                bail!("name mapping references unknown ability '{key}'");
            }
        }
        Ok(Self { names, mapping })
    }

    /// Load the name list (JSON array of strings) and optional mapping
    /// (JSON object, string to string) from disk.
    pub fn load(names_path: &Path, mapping_path: Option<&Path>) -> Result<Self> {
        let names_raw = fs::read_to_string(names_path)
            .with_context(|| format!("reading ability name list {}", names_path.display()))?;
        let names: Vec<String> = serde_json::from_str(&names_raw).with_context(|| {
            format!("parsing {} as a JSON array of strings", names_path.display())
        })?;

        let mapping = match mapping_path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading name mapping {}", path.display()))?;
                serde_json::from_str(&raw).with_context(|| {
                    format!("parsing {} as a JSON string-to-string object", path.display())
                })?
            }
            None => BTreeMap::new(),
        };

        Self::new(names, mapping)
    }

    /// Authoritative names in catalog order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The PDF-side spelling for an ability; identity when unmapped.
    pub fn pdf_name<'a>(&'a self, code_name: &'a str) -> &'a str {
        self.mapping
            .get(code_name)
            .map(String::as_str)
            .unwrap_or(code_name)
    }

    /// (codeName, pdfName) pairs in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(|name| (name.as_str(), self.pdf_name(name)))
    }
}
