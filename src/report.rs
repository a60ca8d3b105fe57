//! Serializable records for the extraction run.
//!
//! The structures mirror `schema/extraction_report.json` so the CLI can
//! round-trip the artifact without ad-hoc maps. Field names on the wire are
//! the stable contract consumed by the manual-review merge step
//! (`codeName`, `pdfName`, `rawText`, `class`, `prerequisites`,
//! `description`); keep them in sync with the schema file.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Final structured record for one ability, ready for manual review.
pub struct ExtractedAbility {
    #[serde(rename = "codeName")]
    pub code_name: String,
    #[serde(rename = "pdfName")]
    pub pdf_name: String,
    #[serde(rename = "rawText")]
    pub raw_text: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub prerequisites: String,
    pub description: String,
}

/// Why one ability produced no record (or produced one with a caveat).
///
/// Known variants keep serialization consistent; `Other` preserves forward
/// compatibility when older tooling reads reports from newer binaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorKind {
    NotFoundInSource,
    FoundBeforeSectionStart,
    EndBoundaryNotFound,
    TextTooShort,
    NameMismatch,
    DuplicateHeading,
    Exception,
    Other(String),
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::NotFoundInSource => "NotFoundInSource",
            ErrorKind::FoundBeforeSectionStart => "FoundBeforeSectionStart",
            ErrorKind::EndBoundaryNotFound => "EndBoundaryNotFound",
            ErrorKind::TextTooShort => "TextTooShort",
            ErrorKind::NameMismatch => "NameMismatch",
            ErrorKind::DuplicateHeading => "DuplicateHeading",
            ErrorKind::Exception => "Exception",
            ErrorKind::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "NotFoundInSource" => ErrorKind::NotFoundInSource,
            "FoundBeforeSectionStart" => ErrorKind::FoundBeforeSectionStart,
            "EndBoundaryNotFound" => ErrorKind::EndBoundaryNotFound,
            "TextTooShort" => ErrorKind::TextTooShort,
            "NameMismatch" => ErrorKind::NameMismatch,
            "DuplicateHeading" => ErrorKind::DuplicateHeading,
            "Exception" => ErrorKind::Exception,
            other => ErrorKind::Other(other.to_string()),
        }
    }

    /// Warnings accompany an emitted record; errors suppress it.
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorKind::NameMismatch | ErrorKind::DuplicateHeading)
    }
}

impl Serialize for ErrorKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One per-ability failure or caveat, collected rather than thrown.
pub struct ExtractionError {
    #[serde(rename = "abilityName")]
    pub ability_name: String,
    pub kind: ErrorKind,
    pub detail: String,
}

impl ExtractionError {
    pub fn new(ability_name: impl Into<String>, kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            ability_name: ability_name.into(),
            kind,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// The externally consumed artifact: ordered records plus the full failure
/// and warning lists, with counts for the operator summary.
pub struct ExtractionReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(rename = "failuresByKind")]
    pub failures_by_kind: BTreeMap<String, usize>,
    pub abilities: Vec<ExtractedAbility>,
    pub errors: Vec<ExtractionError>,
    pub warnings: Vec<ExtractionError>,
}

impl ExtractionReport {
    /// Record an emitted ability.
    pub fn push_ability(&mut self, ability: ExtractedAbility) {
        self.succeeded += 1;
        self.abilities.push(ability);
    }

    /// Record a failure or warning; warnings do not count toward `failed`.
    pub fn push_error(&mut self, error: ExtractionError) {
        if error.kind.is_warning() {
            self.warnings.push(error);
            return;
        }
        *self
            .failures_by_kind
            .entry(error.kind.as_str().to_string())
            .or_insert(0) += 1;
        self.failed += 1;
        self.errors.push(error);
    }

    /// Human-readable run summary for stderr.
    ///
    /// Lists counts first, then one line per failure and warning so an
    /// operator can patch the handful of misses before merging.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "extraction complete: attempted {}, succeeded {}, failed {}\n",
            self.attempted, self.succeeded, self.failed
        ));
        for (kind, count) in &self.failures_by_kind {
            out.push_str(&format!("  {kind}: {count}\n"));
        }
        for error in &self.errors {
            out.push_str(&format!(
                "  FAIL {} [{}] {}\n",
                error.ability_name, error.kind, error.detail
            ));
        }
        for warning in &self.warnings {
            out.push_str(&format!(
                "  WARN {} [{}] {}\n",
                warning.ability_name, warning.kind, warning.detail
            ));
        }
        out
    }
}
