// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;

/// Chat-platform collaborator contract. `Orchestrator`s hold a
/// shared handle to one implementation; `run()` drives the adapter's own
/// background work (token refresh, inbound event pump) and is independent of
/// the request/response methods below. A `Null*` implementation satisfies
/// deployments with no chat platform configured.
#[async_trait]
pub trait Messaging: Send + Sync {
    async fn run(&self) -> anyhow::Result<()>;

    /// Broadcast a message with no specific originating chat (heartbeat reports).
    async fn notify(&self, text: &str) -> anyhow::Result<()>;

    /// Reply within a specific chat session.
    async fn send_message(&self, chat_id: &str, text: &str) -> anyhow::Result<()>;

    async fn add_reaction(&self, message_id: &str, emoji: &str) -> anyhow::Result<()>;

    async fn send_image(&self, chat_id: &str, image_path: &str) -> anyhow::Result<()>;
}
