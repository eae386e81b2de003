// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use vigil_model::{ChatMessage, EventLog, FunctionCall, Messaging, NullEventLog, ToolSpec};
use vigil_tools::{register_human_input_tools, ToolCall, ToolRegistry};

const NO_REPORT_SENTINEL: &str = "NO_REPORT";

/// Per-event policy: what tools an orchestrator exposes and what it does
/// with the final assistant message, expressed as a tagged variant rather
/// than a trait object (`Runtime` follows the same convention).
pub enum Orchestrator {
    Heartbeat(HeartbeatOrchestrator),
    HumanInput(HumanInputOrchestrator),
}

impl Orchestrator {
    fn registry(&self) -> &ToolRegistry {
        match self {
            Orchestrator::Heartbeat(h) => &h.registry,
            Orchestrator::HumanInput(h) => &h.registry,
        }
    }

    fn event_log(&self) -> &Arc<dyn EventLog> {
        match self {
            Orchestrator::Heartbeat(h) => &h.event_log,
            Orchestrator::HumanInput(h) => &h.event_log,
        }
    }

    pub fn tool_schemas(&self) -> Vec<ToolSpec> {
        self.registry().tool_schemas()
    }

    /// Implements the orchestrator state machine from one LLM turn:
    /// dispatch tool calls, nudge an unfinished turn to continue, or settle
    /// the final response and signal loop termination with an empty list.
    pub async fn process(
        &self,
        message: &ChatMessage,
        finish_reason: &str,
    ) -> anyhow::Result<Vec<ChatMessage>> {
        if message.has_tool_calls() {
            self.before_tool_use(message).await?;
            let results =
                dispatch_tool_calls(self.registry(), self.event_log(), &message.tool_calls).await;
            return Ok(results);
        }

        if finish_reason != "stop" {
            return Ok(vec![ChatMessage::user("continue")]);
        }

        let content = message.content.as_deref().unwrap_or("").trim().to_string();
        self.on_final_response(&content).await?;
        Ok(Vec::new())
    }

    async fn before_tool_use(&self, message: &ChatMessage) -> anyhow::Result<()> {
        match self {
            Orchestrator::Heartbeat(_) => Ok(()),
            Orchestrator::HumanInput(h) => h.before_tool_use(message).await,
        }
    }

    async fn on_final_response(&self, content: &str) -> anyhow::Result<()> {
        match self {
            Orchestrator::Heartbeat(h) => h.on_final_response(content).await,
            Orchestrator::HumanInput(h) => h.on_final_response(content).await,
        }
    }
}

/// Reacts to a self-initiated wake-up: no chat session to talk back to, so
/// the only observable side effect is an optional broadcast `notify`.
pub struct HeartbeatOrchestrator {
    registry: ToolRegistry,
    messaging: Arc<dyn Messaging>,
    event_log: Arc<dyn EventLog>,
}

impl HeartbeatOrchestrator {
    pub fn new(registry: ToolRegistry, messaging: Arc<dyn Messaging>) -> Self {
        Self {
            registry,
            messaging,
            event_log: Arc::new(NullEventLog),
        }
    }

    /// Attach a non-default side-channel logger (the default is a no-op).
    pub fn with_event_log(mut self, event_log: Arc<dyn EventLog>) -> Self {
        self.event_log = event_log;
        self
    }

    async fn on_final_response(&self, content: &str) -> anyhow::Result<()> {
        self.event_log.log_agent_response(content);
        if !content.is_empty() && !content.ends_with(NO_REPORT_SENTINEL) {
            self.messaging.notify(content).await?;
        }
        Ok(())
    }
}

/// Reacts to a message from a specific chat session: registers the
/// instance-scoped `add_reaction`/`send_image` tools on its own registry
/// clone and talks back into that one session.
pub struct HumanInputOrchestrator {
    registry: ToolRegistry,
    messaging: Arc<dyn Messaging>,
    chat_id: String,
    event_log: Arc<dyn EventLog>,
}

impl HumanInputOrchestrator {
    pub fn new(
        mut registry: ToolRegistry,
        messaging: Arc<dyn Messaging>,
        chat_id: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        let chat_id = chat_id.into();
        register_human_input_tools(&mut registry, messaging.clone(), chat_id.clone(), message_id);
        Self {
            registry,
            messaging,
            chat_id,
            event_log: Arc::new(NullEventLog),
        }
    }

    /// Attach a non-default side-channel logger (the default is a no-op).
    pub fn with_event_log(mut self, event_log: Arc<dyn EventLog>) -> Self {
        self.event_log = event_log;
        self
    }

    async fn before_tool_use(&self, message: &ChatMessage) -> anyhow::Result<()> {
        if let Some(content) = message.content.as_deref() {
            if !content.trim().is_empty() {
                self.messaging.send_message(&self.chat_id, content).await?;
            }
        }
        Ok(())
    }

    async fn on_final_response(&self, content: &str) -> anyhow::Result<()> {
        self.event_log.log_agent_response(content);
        self.messaging.send_message(&self.chat_id, content).await
    }
}

/// Dispatches every tool call in `calls` concurrently against `registry` and
/// returns one `{role: tool, ...}` message per call, in the same order the
/// calls were given. A single call's parse/validation/dispatch failure
/// never prevents its siblings from completing.
async fn dispatch_tool_calls(
    registry: &ToolRegistry,
    event_log: &Arc<dyn EventLog>,
    calls: &[FunctionCall],
) -> Vec<ChatMessage> {
    let futures = calls.iter().map(|call| async move {
        let args = parse_arguments(&call.name, &call.arguments).unwrap_or(Value::Null);
        let result = resolve_and_execute(registry, call).await;
        event_log.log_tool_use(&call.name, &args, &result);
        ChatMessage::tool(call.id.clone(), result.to_string())
    });
    join_all(futures).await
}

async fn resolve_and_execute(registry: &ToolRegistry, call: &FunctionCall) -> Value {
    let args = match parse_arguments(&call.name, &call.arguments) {
        Ok(v) => v,
        Err(e) => {
            warn!(tool = %call.name, error = %e, "failed to parse tool call arguments");
            return vigil_tools::error(format!("invalid arguments: {e}"));
        }
    };

    if let Some(schema) = registry.get_schema(&call.name) {
        if let Err(e) = validate_required_fields(&schema.parameters, &args) {
            warn!(tool = %call.name, error = %e, "tool call arguments failed schema validation");
            return vigil_tools::error(e);
        }
    }

    debug!(tool = %call.name, tool_call_id = %call.id, "resolved tool call, dispatching");
    let tool_call = ToolCall {
        id: call.id.clone(),
        name: call.name.clone(),
        args,
    };
    registry.execute(&tool_call).await
}

/// Parse `arguments` as JSON. Providers whose function-calling API
/// double-encodes string arguments (observed on `deepseek-ai/`-prefixed
/// models) get a second pass: every top-level string value that itself
/// parses as JSON is replaced by its decoded form.
fn parse_arguments(tool_name: &str, arguments: &str) -> anyhow::Result<Value> {
    let mut value: Value = serde_json::from_str(arguments)?;

    if tool_name.starts_with("deepseek-ai/") {
        if let Value::Object(map) = &mut value {
            for v in map.values_mut() {
                if let Value::String(s) = v {
                    if let Ok(decoded) = serde_json::from_str::<Value>(s) {
                        *v = decoded;
                    }
                }
            }
        }
    }

    Ok(value)
}

/// Lightweight stand-in for full JSON-Schema validation: checks that every
/// name in the schema's `required` array is present in `args`. The corpus
/// has no JSON-Schema validator dependency, so this covers the one property
/// the spec actually needs (missing required arguments become a tool error
/// instead of a handler panic) without adding one.
fn validate_required_fields(schema: &Value, args: &Value) -> Result<(), String> {
    let Some(required) = schema.get("required").and_then(|r| r.as_array()) else {
        return Ok(());
    };
    for field in required {
        let Some(name) = field.as_str() else {
            continue;
        };
        if args.get(name).is_none() {
            return Err(format!("missing required argument: {name}"));
        }
    }
    Ok(())
}
