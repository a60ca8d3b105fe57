//! Goalpost span extraction.
//!
//! Each ability's text runs from the start of its own heading line to the
//! start of the next ability's heading line (end of text for the last one).
//! Headings are located with full-line regex matches; this is a heuristic
//! standing in for document structure that PDF-to-text conversion discarded,
//! and it is confined to this module so a structured input format could
//! replace it without touching the parser or report stages.
//!
//! Offsets are byte offsets into the source text; lines are delimited by
//! `\n` alone.

use crate::catalog::OrderedAbilityRef;
use crate::normalize::heading_pattern;
use crate::report::{ErrorKind, ExtractionError};
use anyhow::{Context, Result, bail};

/// Matches admitted this many bytes before the nominal section start.
///
/// The window exists for anchors that butt up against the first heading;
/// empirically tuned, so callers may override it.
pub const DEFAULT_ANCHOR_TOLERANCE: usize = 10;

#[derive(Debug, Clone)]
/// Literal string marking where the ability-description section begins.
///
/// Everything before its first occurrence (tables of contents, class
/// summaries) is excluded from heading selection.
pub struct SectionAnchor {
    literal: String,
}

impl SectionAnchor {
    pub fn new(literal: impl Into<String>) -> Result<Self> {
        let literal = literal.into();
        if literal.is_empty() {
            bail!("section anchor must not be empty");
        }
        Ok(Self { literal })
    }

    /// Byte offset of the anchor's first occurrence.
    ///
    /// A missing anchor is the one fatal condition of the pipeline: every
    /// later offset computation depends on it.
    pub fn locate(&self, text: &str) -> Result<usize> {
        text.find(&self.literal)
            .with_context(|| format!("section anchor not found in source text: {:?}", self.literal))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One ability's raw text span, trimmed, ready for structural parsing.
pub struct RawBlock {
    pub code_name: String,
    pub pdf_name: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug)]
/// Heading locator bound to one source text and section anchor.
pub struct SpanExtractor<'a> {
    text: &'a str,
    section_start: usize,
    tolerance: usize,
}

impl<'a> SpanExtractor<'a> {
    pub fn new(text: &'a str, anchor: &SectionAnchor, tolerance: usize) -> Result<Self> {
        let section_start = anchor.locate(text)?;
        Ok(Self {
            text,
            section_start,
            tolerance,
        })
    }

    pub fn section_start(&self) -> usize {
        self.section_start
    }

    /// Start offsets of every line consisting exactly of `pdf_name`,
    /// anywhere in the text (callers filter by region).
    pub fn heading_offsets(&self, pdf_name: &str) -> Result<Vec<usize>> {
        let pattern = heading_pattern(pdf_name.trim())?;
        Ok(pattern.find_iter(self.text).map(|m| m.start()).collect())
    }

    fn in_valid_region(&self, offset: usize) -> bool {
        // Saturate: the CLI accepts any usize tolerance.
        offset.saturating_add(self.tolerance) >= self.section_start
    }

    /// Distinguish an ability the text never mentions as a heading from one
    /// whose only heading occurrences sit before the section start.
    pub fn classify_absent(&self, code_name: &str, pdf_name: &str) -> ExtractionError {
        match self.heading_offsets(pdf_name) {
            Ok(offsets) if offsets.is_empty() => ExtractionError::new(
                code_name,
                ErrorKind::NotFoundInSource,
                format!("no standalone-line occurrence of {pdf_name:?}"),
            ),
            Ok(offsets) => ExtractionError::new(
                code_name,
                ErrorKind::FoundBeforeSectionStart,
                format!(
                    "{} occurrence(s) of {pdf_name:?}, all before section start at byte {}",
                    offsets.len(),
                    self.section_start
                ),
            ),
            Err(err) => ExtractionError::new(code_name, ErrorKind::Exception, format!("{err:#}")),
        }
    }

    /// Compute a raw block per resolved ability.
    ///
    /// Start selection follows the goalpost rule: the first valid-region
    /// occurrence at or after the previous ability's chosen start. The end of
    /// block *i* is the next successfully chosen start (a failed neighbor is
    /// skipped over rather than truncating the block), or end of text for the
    /// final ability. Failures are recorded per ability and never abort the
    /// batch.
    pub fn extract(&self, refs: &[OrderedAbilityRef]) -> (Vec<RawBlock>, Vec<ExtractionError>) {
        let mut errors = Vec::new();
        let mut chosen: Vec<(usize, usize)> = Vec::new(); // (ref index, start offset)
        let mut previous_start = 0usize;

        for (index, ability) in refs.iter().enumerate() {
            let offsets = match self.heading_offsets(&ability.pdf_name) {
                Ok(offsets) => offsets,
                Err(err) => {
                    errors.push(ExtractionError::new(
                        &ability.code_name,
                        ErrorKind::Exception,
                        format!("{err:#}"),
                    ));
                    continue;
                }
            };
            if offsets.is_empty() {
                errors.push(ExtractionError::new(
                    &ability.code_name,
                    ErrorKind::NotFoundInSource,
                    format!("no standalone-line occurrence of {:?}", ability.pdf_name),
                ));
                continue;
            }
            let valid: Vec<usize> = offsets
                .iter()
                .copied()
                .filter(|&offset| self.in_valid_region(offset))
                .collect();
            if valid.is_empty() {
                errors.push(ExtractionError::new(
                    &ability.code_name,
                    ErrorKind::FoundBeforeSectionStart,
                    format!(
                        "{} occurrence(s), all before section start at byte {}",
                        offsets.len(),
                        self.section_start
                    ),
                ));
                continue;
            }
            let Some(start) = valid.into_iter().find(|&offset| offset >= previous_start) else {
                errors.push(ExtractionError::new(
                    &ability.code_name,
                    ErrorKind::EndBoundaryNotFound,
                    format!("no occurrence at or after previous heading (byte {previous_start})"),
                ));
                continue;
            };
            chosen.push((index, start));
            previous_start = start;
        }

        let mut blocks = Vec::new();
        for (slot, &(index, start)) in chosen.iter().enumerate() {
            let end = chosen
                .get(slot + 1)
                .map(|&(_, next_start)| next_start)
                .unwrap_or(self.text.len());
            let ability = &refs[index];
            if end <= start {
                errors.push(ExtractionError::new(
                    &ability.code_name,
                    ErrorKind::EndBoundaryNotFound,
                    format!("computed block end {end} does not follow start {start}"),
                ));
                continue;
            }
            blocks.push(RawBlock {
                code_name: ability.code_name.clone(),
                pdf_name: ability.pdf_name.clone(),
                start,
                end,
                text: self.text[start..end].trim().to_string(),
            });
        }

        (blocks, errors)
    }
}
