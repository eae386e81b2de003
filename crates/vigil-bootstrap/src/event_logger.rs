// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use vigil_model::EventLog;

/// The envelope posted to the stream backend, `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
enum LoggedEvent {
    ToolUse {
        tool: String,
        args: Value,
        result: Value,
    },
    AgentResponse {
        content: String,
    },
}

/// Optional HTTP sink for `EventLogger`. Every event is POSTed to
/// `{url}/bot_internal`; `agent_response` events are additionally POSTed to
/// `{url}/bot` so a connected chat surface sees the agent's own replies.
#[derive(Clone)]
pub struct EventSink {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl EventSink {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn post(&self, path: &str, event: &LoggedEvent) {
        let url = format!("{}{}", self.url, path);
        let result = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(event)
            .timeout(Duration::from_secs(60))
            .send()
            .await;
        if let Err(e) = result {
            warn!(error = %e, url = %url, "failed to deliver event");
        }
    }
}

/// Fire-and-forget event stream. A background task drains the queue,
/// batching whatever has accumulated since the last wakeup, and forwards
/// each event to the configured sink one at a time. With no sink configured
/// events are simply traced, so logging calls never block the caller on
/// network I/O either way.
pub struct EventLogger {
    tx: mpsc::UnboundedSender<LoggedEvent>,
}

impl EventLogger {
    pub fn start(sink: Option<EventSink>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<LoggedEvent>();
        let handle = tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut batch = vec![first];
                while let Ok(next) = rx.try_recv() {
                    batch.push(next);
                }
                for event in batch {
                    match &sink {
                        Some(sink) => {
                            sink.post("/bot_internal", &event).await;
                            if matches!(event, LoggedEvent::AgentResponse { .. }) {
                                sink.post("/bot", &event).await;
                            }
                        }
                        None => debug!(?event, "event (no stream sink configured)"),
                    }
                }
            }
        });
        (Self { tx }, handle)
    }

    pub fn log_tool_use(&self, tool: impl Into<String>, args: Value, result: Value) {
        let _ = self.tx.send(LoggedEvent::ToolUse {
            tool: tool.into(),
            args,
            result,
        });
    }

    pub fn log_agent_response(&self, content: impl Into<String>) {
        let _ = self.tx.send(LoggedEvent::AgentResponse {
            content: content.into(),
        });
    }
}

/// Lets the Orchestrator hold this behind the `vigil_model::EventLog` trait
/// object so `vigil-core` never has to depend on `vigil-bootstrap`.
impl EventLog for EventLogger {
    fn log_tool_use(&self, tool: &str, args: &Value, result: &Value) {
        EventLogger::log_tool_use(self, tool, args.clone(), result.clone());
    }

    fn log_agent_response(&self, content: &str) {
        EventLogger::log_agent_response(self, content);
    }
}
