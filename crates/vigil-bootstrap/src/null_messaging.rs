// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use tracing::{debug, info};
use vigil_model::Messaging;

/// Chat-platform collaborator for deployments with no adapter configured.
/// Every outbound call degrades to a structured log line instead of an
/// error, so a bare `vigil` run is still fully observable on stdout.
pub struct NullMessaging;

#[async_trait]
impl Messaging for NullMessaging {
    async fn run(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn notify(&self, text: &str) -> anyhow::Result<()> {
        info!(%text, "heartbeat report (no messaging adapter configured)");
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> anyhow::Result<()> {
        info!(chat_id = %chat_id, %text, "chat reply (no messaging adapter configured)");
        Ok(())
    }

    async fn add_reaction(&self, message_id: &str, emoji: &str) -> anyhow::Result<()> {
        debug!(message_id = %message_id, %emoji, "reaction (no messaging adapter configured)");
        Ok(())
    }

    async fn send_image(&self, chat_id: &str, image_path: &str) -> anyhow::Result<()> {
        debug!(chat_id = %chat_id, %image_path, "image send (no messaging adapter configured)");
        Ok(())
    }
}
