// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use vigil_runtime::{EditOp, Runtime, RuntimeExec};

use crate::tool::{error, Tool};

/// Surgically edits a file by replacing specific blocks of text.
pub struct EditFileTool {
    runtime: Arc<Runtime>,
}

impl EditFileTool {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Surgically edit a file by replacing specific blocks of text. Use \
         this for precise modifications.\n\n\
         Rules:\n\
         1. search must match the file exactly (including indentation).\n\
         2. Provide just enough context in search to be unique.\n\
         3. If multiple changes are needed, provide multiple edit blocks."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path to the file (relative to the workspace or absolute)."
                },
                "edits": {
                    "type": "array",
                    "description": "A list of one or more search-and-replace operations to apply sequentially.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "search": {
                                "type": "string",
                                "description": "The exact snippet of code to look for. Must be a literal match, including whitespace and comments."
                            },
                            "replace": {
                                "type": "string",
                                "description": "The new code to put in place of the search block."
                            }
                        },
                        "required": ["search", "replace"]
                    }
                }
            },
            "required": ["filename", "edits"]
        })
    }

    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let Some(filename) = args.get("filename").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'filename'"));
        };
        let Some(edits_value) = args.get("edits") else {
            return Ok(error("missing 'edits'"));
        };
        let edits: Vec<EditOp> = match serde_json::from_value(edits_value.clone()) {
            Ok(e) => e,
            Err(e) => return Ok(error(format!("invalid 'edits': {e}"))),
        };

        let result = self.runtime.edit_file(filename, &edits).await?;
        Ok(serde_json::to_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn applies_unique_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello world").unwrap();
        let runtime = Arc::new(Runtime::new("", "", dir.path()));
        let tool = EditFileTool::new(runtime);
        let out = tool
            .call(json!({
                "filename": "a.txt",
                "edits": [{"search": "world", "replace": "rust"}]
            }))
            .await
            .unwrap();
        assert_eq!(out["status"], "success");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "hello rust"
        );
    }

    #[tokio::test]
    async fn zero_matches_is_error_and_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello world").unwrap();
        let runtime = Arc::new(Runtime::new("", "", dir.path()));
        let tool = EditFileTool::new(runtime);
        let out = tool
            .call(json!({
                "filename": "a.txt",
                "edits": [{"search": "nope", "replace": "rust"}]
            }))
            .await
            .unwrap();
        assert_eq!(out["status"], "error");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "hello world"
        );
    }
}
