// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crate::types::{EditFileResult, EditOp};

/// Apply `edits` to `content` in memory, sequentially. Returns the fully
/// edited string on success, or an error result on the first edit whose
/// search block has zero or more-than-one occurrences — in which case
/// `content` must be left untouched by the caller (no partial writes).
pub fn apply_edits(content: &str, edits: &[EditOp]) -> Result<String, EditFileResult> {
    let mut current = content.to_string();
    for op in edits {
        let occurrences = current.matches(op.search.as_str()).count();
        match occurrences {
            0 => {
                return Err(EditFileResult::err(format!(
                    "search block not found: {}",
                    op.search
                )));
            }
            1 => {
                current = current.replacen(&op.search, &op.replace, 1);
            }
            n => {
                return Err(EditFileResult::err(format!(
                    "search block is ambiguous: {} occurrences found for: {}",
                    n, op.search
                )));
            }
        }
    }
    Ok(current)
}
