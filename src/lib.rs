//! Shared library for the Athia ability-extraction tooling.
//!
//! The crate turns an authoritative ability name list plus an OCR'd rulebook
//! text dump into structured ability records via goalpost extraction: each
//! ability's text is the span between its own heading line and the next
//! ability's heading line. Binaries (`extract-abilities`, `resolve-order`)
//! are thin CLIs over the pipeline here; every per-ability failure is
//! collected into the report instead of aborting the batch, and the report
//! JSON is the contract reviewed by a human before any merge into the game
//! data.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

pub mod block;
pub mod catalog;
pub mod normalize;
pub mod order;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod span;

pub use block::{ParsedBlock, parse_block};
pub use catalog::{AbilityCatalog, OrderedAbilityRef};
pub use normalize::{fold_apostrophes, heading_pattern, names_equal};
pub use order::{RepeatedHeading, ResolvedOrder, resolve_order};
pub use pipeline::run_extraction;
pub use report::{ErrorKind, ExtractedAbility, ExtractionError, ExtractionReport};
pub use schema::ReportSchema;
pub use span::{DEFAULT_ANCHOR_TOLERANCE, RawBlock, SectionAnchor, SpanExtractor};

/// Read the source text dump, rejecting empty files early.
///
/// The file is expected to be the plain-text rendering of the rulebook's
/// ability pages; an empty file means the upstream conversion step failed and
/// every later stage would report nonsense.
pub fn read_source_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading source text {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("source text {} is empty", path.display());
    }
    Ok(text)
}
