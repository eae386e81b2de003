// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::error;

use vigil_model::Messaging;

use crate::tool::{error, success, Tool};

const EMOJI_CHOICES: &[&str] = &[
    "OK", "THUMBSUP", "MUSCLE", "LOL", "THINKING", "Shrug", "Fire", "Coffee", "PARTY", "CAKE",
    "HEART",
];

/// React to a specific message with an emoji. Only registered while
/// handling the human-input event that carries `message_id`, never on the
/// shared registry.
pub struct AddReactionTool {
    messaging: Arc<dyn Messaging>,
    message_id: String,
}

impl AddReactionTool {
    pub fn new(messaging: Arc<dyn Messaging>, message_id: impl Into<String>) -> Self {
        Self {
            messaging,
            message_id: message_id.into(),
        }
    }
}

#[async_trait]
impl Tool for AddReactionTool {
    fn name(&self) -> &str {
        "add_reaction"
    }

    fn description(&self) -> &str {
        "React to the current message with an emoji."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "emoji": {
                    "type": "string",
                    "enum": EMOJI_CHOICES,
                    "description": "The emoji type to react with."
                }
            },
            "required": ["emoji"]
        })
    }

    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let Some(emoji) = args.get("emoji").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'emoji'"));
        };
        if !EMOJI_CHOICES.contains(&emoji) {
            return Ok(error(format!("unknown emoji '{emoji}'")));
        }

        match self.messaging.add_reaction(&self.message_id, emoji).await {
            Ok(()) => Ok(success(json!({"message": format!("Added reaction {emoji} to message")}))),
            Err(e) => {
                error!(emoji, error = %e, "failed to add reaction");
                Ok(error(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait as at;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMessaging {
        reactions: Mutex<Vec<(String, String)>>,
    }

    #[at]
    impl Messaging for RecordingMessaging {
        async fn run(&self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn notify(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn send_message(&self, _chat_id: &str, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
        async fn add_reaction(&self, message_id: &str, emoji: &str) -> anyhow::Result<()> {
            self.reactions
                .lock()
                .unwrap()
                .push((message_id.to_string(), emoji.to_string()));
            Ok(())
        }
        async fn send_image(&self, _chat_id: &str, _image_path: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn adds_reaction_to_scoped_message() {
        let messaging = Arc::new(RecordingMessaging::default());
        let tool = AddReactionTool::new(messaging.clone(), "msg-1");
        let out = tool.call(json!({"emoji": "Fire"})).await.unwrap();
        assert_eq!(out["status"], "success");
        assert_eq!(
            messaging.reactions.lock().unwrap().as_slice(),
            &[("msg-1".to_string(), "Fire".to_string())]
        );
    }

    #[tokio::test]
    async fn rejects_unknown_emoji() {
        let messaging = Arc::new(RecordingMessaging::default());
        let tool = AddReactionTool::new(messaging, "msg-1");
        let out = tool.call(json!({"emoji": "nonsense"})).await.unwrap();
        assert_eq!(out["status"], "error");
    }
}
