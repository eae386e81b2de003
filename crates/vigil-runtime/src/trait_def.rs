// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;

use crate::types::{EditFileResult, EditOp, ExecuteResult, ReadFileResult, WriteFileResult};

/// Workspace execution surface, implemented by the `Container` and `Host`
/// variants. Toolbox handlers go through this trait exclusively; they never
/// touch a subprocess or the filesystem directly.
///
/// Any underlying OS/subprocess failure that prevents even attempting the
/// operation (e.g. the container binary is missing) is returned as
/// `anyhow::Error` — the Toolbox layer, which already runs inside the
/// ToolRegistry's error wrapper, converts it to `{status: error, message}` at
/// that boundary. Failures that *are* part of the operation's own result
/// space (a non-zero exit code, an ambiguous edit) are returned as `Ok` with
/// an error-shaped payload, since the caller needs the stdout/stderr/message
/// detail alongside the failure.
#[async_trait]
pub trait RuntimeExec: Send + Sync {
    async fn execute(&self, command: &str) -> anyhow::Result<ExecuteResult>;

    async fn read_file(
        &self,
        path: &str,
        start_line: usize,
        limit: usize,
    ) -> anyhow::Result<ReadFileResult>;

    async fn write_file(&self, path: &str, content: &str) -> anyhow::Result<WriteFileResult>;

    async fn edit_file(&self, path: &str, edits: &[EditOp]) -> anyhow::Result<EditFileResult>;

    /// Raw file bytes, untruncated — used internally (e.g. by `read_image`-style
    /// tools) and for round-trip verification; never exposed to the LLM directly.
    async fn read_file_internal(&self, path: &str) -> anyhow::Result<Vec<u8>>;
}
