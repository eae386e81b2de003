// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::Path;
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;

use crate::edit::apply_edits;
use crate::trait_def::RuntimeExec;
use crate::types::{
    truncate_stream, EditFileResult, EditOp, ExecuteResult, ReadFileResult, Status,
    WriteFileResult,
};

/// Executes directly on the host machine: no container indirection.
pub struct HostRuntime {
    cwd: std::path::PathBuf,
}

impl HostRuntime {
    pub fn new(cwd: impl Into<std::path::PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    fn resolve(&self, path: &str) -> std::path::PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.cwd.join(p)
        }
    }
}

#[async_trait]
impl RuntimeExec for HostRuntime {
    async fn execute(&self, command: &str) -> anyhow::Result<ExecuteResult> {
        let mut cmd = Command::new("bash");
        cmd.arg("-c")
            .arg(command)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        unsafe {
            use std::os::unix::process::CommandExt;
            cmd.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }

        let output = cmd
            .output()
            .await
            .with_context(|| format!("spawning command: {command}"))?;

        let stdout = truncate_stream(&String::from_utf8_lossy(&output.stdout));
        let stderr = truncate_stream(&String::from_utf8_lossy(&output.stderr));
        let returncode = output.status.code().unwrap_or(-1);

        Ok(ExecuteResult {
            status: if returncode == 0 {
                Status::Success
            } else {
                Status::Error
            },
            stdout,
            stderr,
            returncode,
        })
    }

    async fn read_file(
        &self,
        path: &str,
        start_line: usize,
        limit: usize,
    ) -> anyhow::Result<ReadFileResult> {
        let full = self.resolve(path);
        let text = tokio::fs::read_to_string(&full)
            .await
            .with_context(|| format!("reading {}", full.display()))?;
        let lines: Vec<&str> = text.lines().collect();
        let total_lines = lines.len();
        let start = start_line.max(1);
        let start_idx = start.saturating_sub(1).min(total_lines);
        let end_idx = start_idx.saturating_add(limit).min(total_lines);
        let window = &lines[start_idx..end_idx];
        Ok(ReadFileResult {
            content: window.join("\n"),
            total_lines,
            start_line: start,
            returned_lines: window.len(),
        })
    }

    async fn write_file(&self, path: &str, content: &str) -> anyhow::Result<WriteFileResult> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(&full, content)
            .await
            .with_context(|| format!("writing {}", full.display()))?;
        Ok(WriteFileResult::ok(format!("wrote {} bytes to {path}", content.len())))
    }

    async fn edit_file(&self, path: &str, edits: &[EditOp]) -> anyhow::Result<EditFileResult> {
        let full = self.resolve(path);
        let current = tokio::fs::read_to_string(&full)
            .await
            .with_context(|| format!("reading {}", full.display()))?;

        match apply_edits(&current, edits) {
            Ok(new_content) => {
                tokio::fs::write(&full, &new_content)
                    .await
                    .with_context(|| format!("writing {}", full.display()))?;
                Ok(EditFileResult::ok(format!(
                    "applied {} edit(s) to {path}",
                    edits.len()
                )))
            }
            Err(err) => Ok(err),
        }
    }

    async fn read_file_internal(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let full = self.resolve(path);
        tokio::fs::read(&full)
            .await
            .with_context(|| format!("reading {}", full.display()))
    }
}
