// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use vigil_model::ToolSpec;

use crate::tool::{error, Tool, ToolCall};

/// Name→handler map, enforcing a per-call timeout and panic guard at
/// dispatch time. `clone()` produces an independent map — cheap, since each
/// entry is an `Arc` clone — so an Orchestrator can register instance-scoped
/// tools on its own copy without mutating the registry the Scheduler holds.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    timeout: Duration,
}

impl ToolRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            tools: HashMap::new(),
            timeout,
        }
    }

    /// Register a tool; name/description/parameters are derived from the
    /// tool's own declarations.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get_schema(&self, name: &str) -> Option<ToolSpec> {
        self.tools.get(name).map(|t| ToolSpec {
            name: t.name().to_string(),
            description: t.description().to_string(),
            parameters: t.parameters(),
        })
    }

    pub fn tool_schemas(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self
            .tools
            .values()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters(),
            })
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Dispatch a single tool call. Never panics and never returns `Err` to
    /// the caller — unknown names, JSON errors, handler panics, and timeouts
    /// are all folded into the `{status: error, message}` shape.
    pub async fn execute(&self, call: &ToolCall) -> Value {
        let tool = match self.tools.get(&call.name) {
            Some(t) => Arc::clone(t),
            None => {
                warn!(tool = %call.name, "dispatch of unknown tool");
                return error(format!("unknown tool: {}", call.name));
            }
        };

        debug!(tool = %call.name, tool_call_id = %call.id, "dispatching tool call");
        let args = call.args.clone();
        let timeout = self.timeout;
        let timeout_secs = timeout.as_secs();
        let tool_name = call.name.clone();

        let join = tokio::spawn(async move { tool.call(args).await });
        match tokio::time::timeout(timeout, join).await {
            Ok(Ok(Ok(value))) => value,
            Ok(Ok(Err(e))) => error(e.to_string()),
            Ok(Err(join_err)) => error(format!("tool panicked: {join_err}")),
            Err(_) => error(format!("Tool {tool_name} timed out after {timeout_secs}s")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration as StdDuration;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes args back"
        }
        fn parameters(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn call(&self, args: Value) -> anyhow::Result<Value> {
            Ok(crate::tool::success(args))
        }
    }

    struct SleepyTool;

    #[async_trait]
    impl Tool for SleepyTool {
        fn name(&self) -> &str {
            "sleepy"
        }
        fn description(&self) -> &str {
            "sleeps longer than the registry timeout"
        }
        fn parameters(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn call(&self, _args: Value) -> anyhow::Result<Value> {
            tokio::time::sleep(StdDuration::from_secs(3600)).await;
            Ok(serde_json::json!({"status": "success"}))
        }
    }

    struct PanickyTool;

    #[async_trait]
    impl Tool for PanickyTool {
        fn name(&self) -> &str {
            "panicky"
        }
        fn description(&self) -> &str {
            "always panics"
        }
        fn parameters(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn call(&self, _args: Value) -> anyhow::Result<Value> {
            panic!("boom");
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "failing"
        }
        fn description(&self) -> &str {
            "always returns Err"
        }
        fn parameters(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn call(&self, _args: Value) -> anyhow::Result<Value> {
            anyhow::bail!("boom")
        }
    }

    #[tokio::test]
    async fn execute_unknown_tool_returns_error() {
        let registry = ToolRegistry::new(StdDuration::from_secs(5));
        let call = ToolCall {
            id: "1".into(),
            name: "nope".into(),
            args: serde_json::json!({}),
        };
        let out = registry.execute(&call).await;
        assert_eq!(out["status"], "error");
        assert!(out["message"].as_str().unwrap().contains("unknown tool"));
    }

    #[tokio::test]
    async fn execute_dispatches_to_registered_tool() {
        let mut registry = ToolRegistry::new(StdDuration::from_secs(5));
        registry.register(EchoTool);
        let call = ToolCall {
            id: "1".into(),
            name: "echo".into(),
            args: serde_json::json!({"x": 1}),
        };
        let out = registry.execute(&call).await;
        assert_eq!(out["status"], "success");
        assert_eq!(out["x"], 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn execute_times_out_with_exact_message_format() {
        let mut registry = ToolRegistry::new(StdDuration::from_millis(50));
        registry.register(SleepyTool);
        let call = ToolCall {
            id: "1".into(),
            name: "sleepy".into(),
            args: serde_json::json!({}),
        };
        let out = registry.execute(&call).await;
        assert_eq!(out["status"], "error");
        assert_eq!(out["message"], "Tool sleepy timed out after 0s");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn execute_catches_panics() {
        let mut registry = ToolRegistry::new(StdDuration::from_secs(5));
        registry.register(PanickyTool);
        let call = ToolCall {
            id: "1".into(),
            name: "panicky".into(),
            args: serde_json::json!({}),
        };
        let out = registry.execute(&call).await;
        assert_eq!(out["status"], "error");
        assert!(out["message"].as_str().unwrap().contains("panicked"));
    }

    #[tokio::test]
    async fn execute_converts_err_to_error_shape() {
        let mut registry = ToolRegistry::new(StdDuration::from_secs(5));
        registry.register(FailingTool);
        let call = ToolCall {
            id: "1".into(),
            name: "failing".into(),
            args: serde_json::json!({}),
        };
        let out = registry.execute(&call).await;
        assert_eq!(out["status"], "error");
        assert_eq!(out["message"], "boom");
    }

    #[test]
    fn clone_produces_independent_registries() {
        let mut registry = ToolRegistry::new(StdDuration::from_secs(5));
        registry.register(EchoTool);
        let mut cloned = registry.clone();
        cloned.register(PanickyTool);
        assert!(registry.has("echo"));
        assert!(!registry.has("panicky"));
        assert!(cloned.has("echo"));
        assert!(cloned.has("panicky"));
    }

    #[test]
    fn tool_schemas_are_sorted_by_name() {
        let mut registry = ToolRegistry::new(StdDuration::from_secs(5));
        registry.register(PanickyTool);
        registry.register(EchoTool);
        let names: Vec<String> = registry.tool_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["echo".to_string(), "panicky".to_string()]);
    }
}
