// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use vigil_runtime::{Runtime, RuntimeExec};

use crate::tool::{error, Tool};

/// Writes content to a file in the workspace, creating parent directories.
pub struct WriteFileTool {
    runtime: Arc<Runtime>,
}

impl WriteFileTool {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file in the workspace. The filename should be \
         relative to the workspace or an absolute path. Parent directories \
         are created if they don't exist."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path to the file (relative to the workspace or absolute)."
                },
                "content": {
                    "type": "string",
                    "description": "The content to write."
                }
            },
            "required": ["filename", "content"]
        })
    }

    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let Some(filename) = args.get("filename").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'filename'"));
        };
        let Some(content) = args.get("content").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'content'"));
        };
        let result = self.runtime.write_file(filename, content).await?;
        Ok(serde_json::to_value(result)?)
    }
}
