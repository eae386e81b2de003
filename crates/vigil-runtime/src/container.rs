// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::process::Stdio;

use anyhow::{bail, Context};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::edit::apply_edits;
use crate::trait_def::RuntimeExec;
use crate::types::{
    truncate_stream, EditFileResult, EditOp, ExecuteResult, ReadFileResult, Status,
    WriteFileResult,
};

/// Executes inside a container via `{runtime} exec` (docker/podman-compatible
/// CLI). Large file transfers go over stdin/stdout as base64 to sidestep
/// shell-quoting hazards with arbitrary file content.
pub struct ContainerRuntime {
    runtime: String,
    container_name: String,
}

impl ContainerRuntime {
    pub fn new(runtime: impl Into<String>, container_name: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            container_name: container_name.into(),
        }
    }

    /// Run `bash -c script` inside the container, optionally feeding `stdin`.
    /// Returns (stdout, stderr, exit_code); never truncates — callers decide.
    async fn exec_in_container(
        &self,
        script: &str,
        stdin_data: Option<&[u8]>,
    ) -> anyhow::Result<(Vec<u8>, Vec<u8>, i32)> {
        let mut cmd = Command::new(&self.runtime);
        cmd.arg("exec");
        if stdin_data.is_some() {
            cmd.arg("-i");
        }
        cmd.arg(&self.container_name)
            .arg("bash")
            .arg("-c")
            .arg(script)
            .stdin(if stdin_data.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning `{} exec`", self.runtime))?;

        if let Some(data) = stdin_data {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(data).await.context("writing to container stdin")?;
            }
        }

        let output = child
            .wait_with_output()
            .await
            .context("waiting for container exec")?;
        Ok((
            output.stdout,
            output.stderr,
            output.status.code().unwrap_or(-1),
        ))
    }

    fn quote(path: &str) -> String {
        format!("'{}'", path.replace('\'', "'\\''"))
    }
}

#[async_trait]
impl RuntimeExec for ContainerRuntime {
    async fn execute(&self, command: &str) -> anyhow::Result<ExecuteResult> {
        let (stdout, stderr, returncode) = self.exec_in_container(command, None).await?;
        let stdout = truncate_stream(&String::from_utf8_lossy(&stdout));
        let stderr = truncate_stream(&String::from_utf8_lossy(&stderr));
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
        let q = Self::quote(path);
        let start = start_line.max(1);
        let end = start + limit.saturating_sub(1);
        let script = format!(
            "total=$(wc -l < {q} 2>/dev/null || echo 0); body=$(sed -n '{start},{end}p' {q}); printf '%s\\n%s' \"$total\" \"$body\""
        );
        let (stdout, stderr, code) = self.exec_in_container(&script, None).await?;
        if code != 0 {
            bail!(
                "reading {path} failed: {}",
                String::from_utf8_lossy(&stderr)
            );
        }
        let text = String::from_utf8_lossy(&stdout);
        let mut parts = text.splitn(2, '\n');
        let total_lines: usize = parts.next().unwrap_or("0").trim().parse().unwrap_or(0);
        let content = parts.next().unwrap_or("").to_string();
        let returned_lines = if content.is_empty() {
            0
        } else {
            content.lines().count()
        };
        Ok(ReadFileResult {
            content,
            total_lines,
            start_line: start,
            returned_lines,
        })
    }

    async fn write_file(&self, path: &str, content: &str) -> anyhow::Result<WriteFileResult> {
        let q = Self::quote(path);
        let script = format!("mkdir -p \"$(dirname {q})\" && base64 -d > {q}");
        let encoded = B64.encode(content.as_bytes());
        let (_, stderr, code) = self
            .exec_in_container(&script, Some(encoded.as_bytes()))
            .await?;
        if code != 0 {
            bail!(
                "writing {path} failed: {}",
                String::from_utf8_lossy(&stderr)
            );
        }
        Ok(WriteFileResult::ok(format!(
            "wrote {} bytes to {path}",
            content.len()
        )))
    }

    async fn edit_file(&self, path: &str, edits: &[EditOp]) -> anyhow::Result<EditFileResult> {
        let bytes = self.read_file_internal(path).await?;
        let current = String::from_utf8_lossy(&bytes).to_string();
        match apply_edits(&current, edits) {
            Ok(new_content) => {
                self.write_file(path, &new_content).await?;
                Ok(EditFileResult::ok(format!(
                    "applied {} edit(s) to {path}",
                    edits.len()
                )))
            }
            Err(err) => Ok(err),
        }
    }

    async fn read_file_internal(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let q = Self::quote(path);
        let script = format!("base64 {q}");
        let (stdout, stderr, code) = self.exec_in_container(&script, None).await?;
        if code != 0 {
            bail!(
                "reading {path} failed: {}",
                String::from_utf8_lossy(&stderr)
            );
        }
        let cleaned: Vec<u8> = stdout
            .iter()
            .copied()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        B64.decode(&cleaned).context("decoding base64 file transport")
    }
}
