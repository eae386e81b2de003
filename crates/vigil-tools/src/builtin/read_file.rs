// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use vigil_runtime::{Runtime, RuntimeExec};

use crate::tool::{error, Tool};

const DEFAULT_START_LINE: usize = 1;
const DEFAULT_LIMIT: usize = 200;

/// Reads content from a file in the workspace, paginated by line.
pub struct ReadFileTool {
    runtime: Arc<Runtime>,
}

impl ReadFileTool {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read content from a file in the workspace. The filename should be \
         relative to the workspace or an absolute path. Returns max 200 \
         lines by default; use start_line to read further."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path to the file (relative to the workspace or absolute)."
                },
                "start_line": {
                    "type": "integer",
                    "description": "The line number to start reading from (default: 1). Use this for pagination."
                },
                "limit": {
                    "type": "integer",
                    "description": "The maximum number of lines to read (default: 200)."
                }
            },
            "required": ["filename"]
        })
    }

    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let Some(filename) = args.get("filename").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'filename'"));
        };
        let start_line = args
            .get("start_line")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_START_LINE);
        let limit = args
            .get("limit")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_LIMIT);

        let result = self.runtime.read_file(filename, start_line, limit).await?;
        Ok(serde_json::to_value(result)?)
    }
}
