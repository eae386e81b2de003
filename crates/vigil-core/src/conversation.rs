// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashSet;

use vigil_model::ChatMessage;

/// Per-chat_id state. The Scheduler is the sole writer; exactly one
/// `Conversation` exists per chat_id for the process lifetime.
#[derive(Debug, Default)]
pub struct Conversation {
    pub chat_id: String,
    pub messages: Vec<ChatMessage>,
    /// Dedup set of already-processed inbound message_ids. Unbounded by
    /// design — an LRU cap is a reasonable future extension, not built here.
    pub message_ids: HashSet<String>,
    /// The LLM-reported total token usage of the last completed run.
    pub total_tokens: u64,
    /// Compressed digest produced by `Agent::compress`, empty until `/compress`.
    pub previous_summary: String,
}

impl Conversation {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            messages: Vec::new(),
            message_ids: HashSet::new(),
            total_tokens: 0,
            previous_summary: String::new(),
        }
    }

    /// True if `message_id` has already been processed for this conversation.
    pub fn has_processed(&self, message_id: &str) -> bool {
        self.message_ids.contains(message_id)
    }

    /// Record `message_id` as processed. Idempotent.
    pub fn mark_processed(&mut self, message_id: impl Into<String>) {
        self.message_ids.insert(message_id.into());
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Reset to an empty conversation, keeping the chat_id (used by `/new`
    /// and by a successful `/compress`).
    pub fn reset_messages(&mut self) {
        self.messages.clear();
        self.total_tokens = 0;
    }
}
