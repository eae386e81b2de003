// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use vigil_model::{ChatMessage, CompletionRequest, CompletionResponse, ModelProvider, Role};

use crate::orchestrator::Orchestrator;

const SUMMARIZER_SYSTEM_PROMPT: &str = "You summarize a conversation transcript into a dense, \
third-person, past-tense digest for an autonomous agent's own future reference. Be concise. \
Do not address the reader; describe what happened.";

fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "SYSTEM",
        Role::User => "USER",
        Role::Assistant => "ASSISTANT",
        Role::Tool => "TOOL",
    }
}

/// The result of one `Agent::run` call: the terminal LLM response (content,
/// finish reason, usage) plus the full non-system message history — the
/// original input plus every assistant/tool/nudge message produced along
/// the way — so the caller can persist it as the Conversation's new state.
pub struct AgentRunOutcome {
    pub response: CompletionResponse,
    pub messages: Vec<ChatMessage>,
}

/// Drives the multi-turn LLM↔tool conversation loop and the on-demand
/// history-compaction operation. Holds only a `ModelProvider` handle —
/// everything else (prompt, messages, tool policy) is supplied per call, so
/// one `Agent` instance serves every event the Scheduler dispatches.
pub struct Agent {
    model: Arc<dyn ModelProvider>,
}

impl Agent {
    pub fn new(model: Arc<dyn ModelProvider>) -> Self {
        Self { model }
    }

    /// Run one event's full conversation to completion: repeatedly call the
    /// model, hand its output to `orchestrator`, and stop as soon as the
    /// orchestrator returns no follow-up messages.
    pub async fn run(
        &self,
        system_prompt: String,
        mut messages: Vec<ChatMessage>,
        orchestrator: &Orchestrator,
    ) -> anyhow::Result<AgentRunOutcome> {
        let system_messages = vec![ChatMessage::system(system_prompt)];
        let tools = orchestrator.tool_schemas();

        loop {
            let mut request_messages = system_messages.clone();
            request_messages.extend(messages.iter().cloned());

            let request = CompletionRequest {
                messages: request_messages,
                tools: tools.clone(),
                temperature: None,
            };

            let response = self.model.complete(request).await?;
            messages.push(response.message.clone());

            let follow_ups = orchestrator
                .process(&response.message, &response.finish_reason)
                .await?;

            if follow_ups.is_empty() {
                return Ok(AgentRunOutcome { response, messages });
            }
            messages.extend(follow_ups);
        }
    }

    /// Produce a dense summary of `messages`, or `""` for an empty slice
    /// without making any LLM call.
    pub async fn compress(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        if messages.is_empty() {
            return Ok(String::new());
        }

        let transcript = messages
            .iter()
            .filter_map(|m| {
                m.content
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .map(|c| format!("[{}]\n{}", role_label(m.role), c))
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let request = CompletionRequest {
            messages: vec![
                ChatMessage::system(SUMMARIZER_SYSTEM_PROMPT),
                ChatMessage::user(transcript),
            ],
            tools: Vec::new(),
            temperature: Some(0.3),
        };

        let response = self.model.complete(request).await?;
        Ok(response.message.content.unwrap_or_default().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vigil_model::{CompletionResponse, StubModelProvider, Usage};
    use vigil_tools::ToolRegistry;

    use crate::orchestrator::HeartbeatOrchestrator;
    use async_trait::async_trait;

    #[derive(Default)]
    struct NullMessaging;

    #[async_trait]
    impl vigil_model::Messaging for NullMessaging {
        async fn run(&self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn notify(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn send_message(&self, _chat_id: &str, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn add_reaction(&self, _message_id: &str, _emoji: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn send_image(&self, _chat_id: &str, _image_path: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn heartbeat_orchestrator() -> Orchestrator {
        Orchestrator::Heartbeat(HeartbeatOrchestrator::new(
            ToolRegistry::new(Duration::from_secs(5)),
            Arc::new(NullMessaging),
        ))
    }

    #[tokio::test]
    async fn run_terminates_on_first_stop_response() {
        let stub = StubModelProvider::new();
        stub.push(CompletionResponse {
            message: ChatMessage::assistant("All quiet.\nNO_REPORT"),
            finish_reason: "stop".into(),
            usage: Usage::default(),
        });
        let agent = Agent::new(Arc::new(stub));
        let orch = heartbeat_orchestrator();
        let outcome = agent
            .run("system prompt".into(), vec![ChatMessage::user("go")], &orch)
            .await
            .unwrap();
        assert_eq!(outcome.response.finish_reason, "stop");
        assert_eq!(outcome.messages.len(), 2);
    }

    #[tokio::test]
    async fn run_loops_until_stop_when_finish_reason_is_not_stop() {
        let stub = StubModelProvider::new();
        stub.push(CompletionResponse {
            message: ChatMessage::assistant("still thinking"),
            finish_reason: "length".into(),
            usage: Usage::default(),
        });
        stub.push(CompletionResponse {
            message: ChatMessage::assistant("done"),
            finish_reason: "stop".into(),
            usage: Usage::default(),
        });
        let agent = Agent::new(Arc::new(stub));
        let orch = heartbeat_orchestrator();
        let outcome = agent
            .run("system prompt".into(), vec![ChatMessage::user("go")], &orch)
            .await
            .unwrap();
        assert_eq!(outcome.response.message.content.as_deref(), Some("done"));
        // one original user message + two assistant turns + one "continue" nudge
        assert_eq!(outcome.messages.len(), 4);
    }

    #[tokio::test]
    async fn compress_empty_messages_returns_empty_without_llm_call() {
        let stub = StubModelProvider::new();
        let agent = Agent::new(Arc::new(stub));
        let summary = agent.compress(&[]).await.unwrap();
        assert_eq!(summary, "");
    }

    #[tokio::test]
    async fn compress_returns_trimmed_model_content() {
        let stub = StubModelProvider::new();
        stub.push(CompletionResponse {
            message: ChatMessage::assistant("  user asked about deploys.  "),
            finish_reason: "stop".into(),
            usage: Usage::default(),
        });
        let agent = Agent::new(Arc::new(stub));
        let summary = agent
            .compress(&[ChatMessage::user("deploy it")])
            .await
            .unwrap();
        assert_eq!(summary, "user asked about deploys.");
    }
}
