// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::provider::ModelProvider;
use crate::types::{ChatMessage, CompletionRequest, CompletionResponse, Usage};

/// A scripted `ModelProvider` test double: responses are consumed in the
/// order they were queued. Lets `Agent`/`Scheduler` tests run deterministically
/// end-to-end without a real network call, the same role `sven-model::mock`
/// plays in the corpus's own test suite.
pub struct StubModelProvider {
    responses: Mutex<VecDeque<CompletionResponse>>,
    /// All requests this stub has seen, for assertions in tests.
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubModelProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response that will be returned in FIFO order.
    pub fn push(&self, response: CompletionResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Convenience: queue a plain text, finish-reason-"stop" response with no
    /// tool calls and the given `total_tokens`.
    pub fn push_text(&self, text: impl Into<String>, total_tokens: u64) {
        self.push(CompletionResponse {
            message: ChatMessage::assistant(text.into()),
            finish_reason: "stop".to_string(),
            usage: Usage {
                input_tokens: 0,
                output_tokens: 0,
                total_tokens,
            },
        });
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for StubModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelProvider for StubModelProvider {
    async fn complete(&self, request: CompletionRequest) -> anyhow::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("StubModelProvider: no scripted response queued"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FunctionCall;

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let stub = StubModelProvider::new();
        stub.push_text("first", 10);
        stub.push_text("second", 20);

        let req = CompletionRequest {
            messages: vec![],
            tools: vec![],
            temperature: None,
        };
        let r1 = stub.complete(req.clone()).await.unwrap();
        let r2 = stub.complete(req).await.unwrap();
        assert_eq!(r1.message.content.as_deref(), Some("first"));
        assert_eq!(r2.message.content.as_deref(), Some("second"));
        assert_eq!(r2.usage.total_tokens, 20);
    }

    #[tokio::test]
    async fn errors_when_exhausted() {
        let stub = StubModelProvider::new();
        let req = CompletionRequest {
            messages: vec![],
            tools: vec![],
            temperature: None,
        };
        assert!(stub.complete(req).await.is_err());
    }

    #[tokio::test]
    async fn records_requests_for_assertions() {
        let stub = StubModelProvider::new();
        stub.push_text("ok", 1);
        let req = CompletionRequest {
            messages: vec![ChatMessage::user("hello")],
            tools: vec![],
            temperature: None,
        };
        stub.complete(req).await.unwrap();
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn can_queue_tool_call_response() {
        let stub = StubModelProvider::new();
        stub.push(CompletionResponse {
            message: ChatMessage::assistant_with_tool_calls(
                None,
                vec![FunctionCall {
                    id: "call_1".into(),
                    name: "run_command".into(),
                    arguments: "{\"command\":\"ls\"}".into(),
                }],
            ),
            finish_reason: "tool_calls".to_string(),
            usage: Usage::default(),
        });
        let req = CompletionRequest {
            messages: vec![],
            tools: vec![],
            temperature: None,
        };
        let resp = stub.complete(req).await.unwrap();
        assert!(resp.message.has_tool_calls());
        assert_eq!(resp.finish_reason, "tool_calls");
    }
}
