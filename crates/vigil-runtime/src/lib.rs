// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod container;
mod edit;
mod host;
mod trait_def;
mod types;

pub use container::ContainerRuntime;
pub use host::HostRuntime;
pub use trait_def::RuntimeExec;
pub use types::*;

use async_trait::async_trait;

/// A tagged variant over the two
/// concrete executors, presenting one interface. Prefer this over a trait
/// object at the call site since there are exactly two variants and no
/// third is expected.
pub enum Runtime {
    Container(ContainerRuntime),
    Host(HostRuntime),
}

impl Runtime {
    /// Build the appropriate variant: a non-empty `container_runtime` selects
    /// `Container`, an empty one selects `Host` — matching the
    /// "`container_{name, runtime}`: workspace runtime (if empty runtime → Host)".
    pub fn new(container_runtime: &str, container_name: &str, host_cwd: impl Into<std::path::PathBuf>) -> Self {
        if container_runtime.is_empty() {
            Runtime::Host(HostRuntime::new(host_cwd))
        } else {
            Runtime::Container(ContainerRuntime::new(container_runtime, container_name))
        }
    }
}

#[async_trait]
impl RuntimeExec for Runtime {
    async fn execute(&self, command: &str) -> anyhow::Result<ExecuteResult> {
        match self {
            Runtime::Container(c) => c.execute(command).await,
            Runtime::Host(h) => h.execute(command).await,
        }
    }

    async fn read_file(
        &self,
        path: &str,
        start_line: usize,
        limit: usize,
    ) -> anyhow::Result<ReadFileResult> {
        match self {
            Runtime::Container(c) => c.read_file(path, start_line, limit).await,
            Runtime::Host(h) => h.read_file(path, start_line, limit).await,
        }
    }

    async fn write_file(&self, path: &str, content: &str) -> anyhow::Result<WriteFileResult> {
        match self {
            Runtime::Container(c) => c.write_file(path, content).await,
            Runtime::Host(h) => h.write_file(path, content).await,
        }
    }

    async fn edit_file(&self, path: &str, edits: &[EditOp]) -> anyhow::Result<EditFileResult> {
        match self {
            Runtime::Container(c) => c.edit_file(path, edits).await,
            Runtime::Host(h) => h.edit_file(path, edits).await,
        }
    }

    async fn read_file_internal(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        match self {
            Runtime::Container(c) => c.read_file_internal(path).await,
            Runtime::Host(h) => h.read_file_internal(path).await,
        }
    }
}
