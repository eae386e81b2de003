// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Bytes beyond this size, per stream, are truncated with a trailing marker.
/// stdout/stderr are truncated to 5000 bytes with a truncation marker appended.
pub const TRUNCATE_BYTES: usize = 5000;

pub(crate) fn truncate_stream(s: &str) -> String {
    if s.len() <= TRUNCATE_BYTES {
        return s.to_string();
    }
    let mut end = TRUNCATE_BYTES;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}\n... [truncated, {} of {} bytes shown]",
        &s[..end],
        end,
        s.len()
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResult {
    pub status: Status,
    pub stdout: String,
    pub stderr: String,
    pub returncode: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadFileResult {
    pub content: String,
    pub total_lines: usize,
    pub start_line: usize,
    pub returned_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteFileResult {
    pub status: Status,
    pub message: String,
}

impl WriteFileResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditFileResult {
    pub status: Status,
    pub message: String,
}

impl EditFileResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }
}

/// One search/replace operation, applied in sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOp {
    pub search: String,
    pub replace: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_stream_is_not_truncated() {
        assert_eq!(truncate_stream("hello"), "hello");
    }

    #[test]
    fn long_stream_is_truncated_with_marker() {
        let s = "x".repeat(TRUNCATE_BYTES + 100);
        let t = truncate_stream(&s);
        assert!(t.contains("truncated"));
        assert!(t.len() < s.len());
    }

    #[test]
    fn truncation_respects_utf8_boundaries() {
        // Build a string whose byte TRUNCATE_BYTES would land mid-codepoint.
        let mut s = "a".repeat(TRUNCATE_BYTES - 1);
        s.push('日'); // 3-byte char straddling the cutoff
        s.push_str(&"b".repeat(50));
        let t = truncate_stream(&s);
        assert!(t.is_char_boundary(t.len().min(s.len())) || t.contains("truncated"));
    }
}
