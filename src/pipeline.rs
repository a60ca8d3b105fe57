//! End-to-end batch orchestration.
//!
//! One run: resolve the canonical heading order, cut goalpost spans, parse
//! each block, and fold everything into a single report. Per-ability failures
//! become report entries; the only fatal conditions are a missing section
//! anchor and a catalog whose headings cannot be told apart.

use crate::block::parse_block;
use crate::catalog::AbilityCatalog;
use crate::order::resolve_order;
use crate::report::{ErrorKind, ExtractionError, ExtractionReport};
use crate::span::{SectionAnchor, SpanExtractor};
use anyhow::Result;
use std::collections::BTreeSet;

/// Run the full extraction batch over already-loaded inputs.
///
/// Deterministic: identical inputs produce a byte-identical serialized
/// report. Every catalog entry is accounted for exactly once, as a record,
/// a failure, or both a record and a warning.
pub fn run_extraction(
    catalog: &AbilityCatalog,
    text: &str,
    anchor: &SectionAnchor,
    tolerance: usize,
) -> Result<ExtractionReport> {
    let extractor = SpanExtractor::new(text, anchor, tolerance)?;
    let resolved = resolve_order(catalog, text, extractor.section_start(), tolerance)?;

    let mut report = ExtractionReport::default();
    report.attempted = catalog.names().len();

    // Catalog entries whose heading never matched a standalone line in the
    // valid region: distinguish "not in the text" from "only before the
    // section start".
    let in_order: BTreeSet<&str> = resolved.refs.iter().map(|r| r.code_name.as_str()).collect();
    for (code_name, pdf_name) in catalog.entries() {
        if !in_order.contains(code_name) {
            report.push_error(extractor.classify_absent(code_name, pdf_name));
        }
    }

    for repeat in &resolved.repeats {
        report.push_error(ExtractionError::new(
            &repeat.code_name,
            ErrorKind::DuplicateHeading,
            format!(
                "heading also matches standalone line {}; first occurrence was used",
                repeat.line_number
            ),
        ));
    }

    let (blocks, span_errors) = extractor.extract(&resolved.refs);
    for error in span_errors {
        report.push_error(error);
    }

    for block in &blocks {
        match parse_block(block) {
            Ok(parsed) => {
                report.push_ability(parsed.ability);
                if let Some(warning) = parsed.warning {
                    report.push_error(warning);
                }
            }
            Err(error) => report.push_error(error),
        }
    }

    Ok(report)
}
