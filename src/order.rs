//! Canonical heading order resolution.
//!
//! Extraction correctness depends on knowing which ability's heading comes
//! immediately after another's in the source text, and the catalog order
//! (usually alphabetical) is no guarantee of that. The resolver scans the
//! post-anchor region line by line and records every line whose trimmed,
//! apostrophe-folded form equals a known PDF name. Full-line equality is
//! deliberate: a name mentioned inside running prose (for example as a
//! prerequisite reference) must not be mistaken for a heading.

use crate::catalog::{AbilityCatalog, OrderedAbilityRef};
use crate::normalize::fold_apostrophes;
use anyhow::{Result, bail};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
/// Scan result: first occurrences in encounter order, plus repeats.
///
/// A repeat means a PDF name matched more than one standalone line in the
/// valid region. The extractor still uses the first-after-previous heuristic,
/// but repeats are surfaced so an operator reviews the collision instead of
/// trusting it.
pub struct ResolvedOrder {
    pub refs: Vec<OrderedAbilityRef>,
    pub repeats: Vec<RepeatedHeading>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A later standalone-line occurrence of an already-seen heading.
pub struct RepeatedHeading {
    #[serde(rename = "codeName")]
    pub code_name: String,
    #[serde(rename = "lineNumber")]
    pub line_number: usize,
}

/// Discover the order ability headings actually occur in, at or after
/// `section_start` (a byte offset into `text`).
///
/// Lines are delimited by `\n` alone. A line participates when any part of
/// it sits at or after the anchor offset, or when its start falls within
/// `tolerance` bytes before the anchor; the latter matches the span
/// extractor's admission rule so the first heading is never dropped when the
/// anchor butts up against it. Fails only when two catalog entries fold to
/// the same PDF heading, which the positional heuristic cannot untangle.
pub fn resolve_order(
    catalog: &AbilityCatalog,
    text: &str,
    section_start: usize,
    tolerance: usize,
) -> Result<ResolvedOrder> {
    let mut by_folded: BTreeMap<String, &str> = BTreeMap::new();
    for (code_name, pdf_name) in catalog.entries() {
        let folded = fold_apostrophes(pdf_name.trim());
        if let Some(existing) = by_folded.insert(folded, code_name) {
            bail!(
                "abilities '{existing}' and '{code_name}' share the PDF heading '{}'",
                pdf_name.trim()
            );
        }
    }

    let mut refs: Vec<OrderedAbilityRef> = Vec::new();
    let mut repeats = Vec::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();

    let mut offset = 0usize;
    for (line_number, line) in text.split('\n').enumerate() {
        let start = offset;
        offset += line.len() + 1;
        let overlaps_region = start + line.len() > section_start;
        let within_tolerance = start.saturating_add(tolerance) >= section_start;
        if !overlaps_region && !within_tolerance {
            continue;
        }
        let folded = fold_apostrophes(line.trim());
        let Some(&code_name) = by_folded.get(folded.as_str()) else {
            continue;
        };
        if seen.contains(code_name) {
            repeats.push(RepeatedHeading {
                code_name: code_name.to_string(),
                line_number,
            });
            continue;
        }
        seen.insert(code_name);
        refs.push(OrderedAbilityRef {
            code_name: code_name.to_string(),
            pdf_name: catalog.pdf_name(code_name).to_string(),
            position: refs.len(),
            line_number,
        });
    }

    Ok(ResolvedOrder { refs, repeats })
}
