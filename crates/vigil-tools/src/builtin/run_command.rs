// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use vigil_runtime::{Runtime, RuntimeExec};

use crate::tool::{error, Tool};

/// Executes a shell command via the configured `Runtime` (host or container).
pub struct RunCommandTool {
    runtime: Arc<Runtime>,
}

impl RunCommandTool {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for RunCommandTool {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Executes a shell command in the workspace. Use this to explore the \
         filesystem, run scripts, or execute any shell command."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute in the workspace."
                }
            },
            "required": ["command"]
        })
    }

    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let Some(command) = args.get("command").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'command'"));
        };
        let result = self.runtime.execute(command).await?;
        Ok(serde_json::to_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_command_is_error() {
        let runtime = Arc::new(Runtime::new("", "", std::env::temp_dir()));
        let tool = RunCommandTool::new(runtime);
        let out = tool.call(json!({})).await.unwrap();
        assert_eq!(out["status"], "error");
    }

    #[tokio::test]
    async fn runs_via_host_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(Runtime::new("", "", dir.path()));
        let tool = RunCommandTool::new(runtime);
        let out = tool.call(json!({"command": "echo hi"})).await.unwrap();
        assert_eq!(out["status"], "success");
        assert_eq!(out["stdout"], "hi\n");
    }
}
