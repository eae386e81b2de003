// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use serde_json::Value;

/// A parsed tool call ready for dispatch, as produced from the model's
/// `FunctionCall` once `arguments` has been JSON-decoded.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub args: Value,
}

/// One tool exposed to the model. Implementors are registered into a
/// `ToolRegistry`, which derives the advertised schema from `name`/
/// `description`/`parameters` and wraps `call` with a timeout and a panic
/// guard so a single misbehaving tool can never take down dispatch.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value;

    /// Run the tool. A returned `Err` becomes `{status: error, message}` at
    /// the registry boundary — implementors should prefer returning
    /// `Ok(json!({"status": "error", ...}))` themselves when the failure is
    /// part of the tool's own result vocabulary (e.g. a non-zero exit code),
    /// reserving `Err` for conditions the tool itself cannot classify.
    async fn call(&self, args: Value) -> anyhow::Result<Value>;
}

pub fn success(value: Value) -> Value {
    let mut obj = value.as_object().cloned().unwrap_or_default();
    obj.entry("status".to_string())
        .or_insert(Value::String("success".to_string()));
    Value::Object(obj)
}

pub fn error(message: impl Into<String>) -> Value {
    serde_json::json!({"status": "error", "message": message.into()})
}
