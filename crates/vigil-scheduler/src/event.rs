// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

/// Everything that can wake the scheduler's single consumer: a self-initiated
/// heartbeat, or an inbound message from a specific chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Heartbeat,
    HumanInput {
        chat_id: String,
        message_id: String,
        message: String,
    },
}

/// Sending half of the event queue; cloned freely by the HTTP ingress and
/// any messaging adapter that wants to enqueue inbound activity.
pub type EventSender = tokio::sync::mpsc::UnboundedSender<Event>;
