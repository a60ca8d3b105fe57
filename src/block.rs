//! Structural parsing of one raw ability block.
//!
//! The PDF-to-text contract this component depends on: heading line, then a
//! class/prerequisite line, then free-text description lines until the next
//! heading. Parsing is heuristic line splitting, not grammar work; anything
//! under three lines is rejected rather than guessed at.

use crate::normalize::names_equal;
use crate::report::{ErrorKind, ExtractedAbility, ExtractionError};
use crate::span::RawBlock;

#[derive(Debug)]
/// A parsed record plus an optional heading-mismatch warning.
///
/// The warning is non-fatal: the record is still emitted, and the operator
/// decides whether the observed heading indicates a mapping problem.
pub struct ParsedBlock {
    pub ability: ExtractedAbility,
    pub warning: Option<ExtractionError>,
}

/// Split a raw block into heading, class/prerequisites, and description.
///
/// Line 1 splits on its first comma: class before, prerequisites after
/// (inner commas preserved, empty when no comma). Lines 2 onward join into
/// the description. Fails with `TextTooShort` when fewer than three lines
/// are present or the description trims to nothing.
pub fn parse_block(block: &RawBlock) -> Result<ParsedBlock, ExtractionError> {
    let lines: Vec<&str> = block.text.split('\n').collect();
    if lines.len() < 3 {
        return Err(ExtractionError::new(
            &block.code_name,
            ErrorKind::TextTooShort,
            format!("block has {} line(s), need at least 3", lines.len()),
        ));
    }

    let heading = lines[0].trim();
    let warning = if names_equal(heading, block.pdf_name.trim()) {
        None
    } else {
        Some(ExtractionError::new(
            &block.code_name,
            ErrorKind::NameMismatch,
            format!("expected heading {:?}, found {heading:?}", block.pdf_name),
        ))
    };

    let (class_name, prerequisites) = split_class_line(lines[1]);

    let description = lines[2..].join("\n").trim().to_string();
    if description.is_empty() {
        return Err(ExtractionError::new(
            &block.code_name,
            ErrorKind::TextTooShort,
            "description lines are empty after trimming",
        ));
    }

    Ok(ParsedBlock {
        ability: ExtractedAbility {
            code_name: block.code_name.clone(),
            pdf_name: block.pdf_name.clone(),
            raw_text: block.text.clone(),
            class_name,
            prerequisites,
            description,
        },
        warning,
    })
}

/// First-comma split of the class/prerequisite line.
fn split_class_line(line: &str) -> (String, String) {
    match line.split_once(',') {
        Some((class_name, rest)) => (class_name.trim().to_string(), rest.trim().to_string()),
        None => (line.trim().to_string(), String::new()),
    }
}
