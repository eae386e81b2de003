// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use vigil_model::Messaging;

use crate::tool::{error, success, Tool};

const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Sends an image file to the user in a specific chat. Only registered
/// while handling the human-input event that carries `chat_id`.
pub struct SendImageTool {
    messaging: Arc<dyn Messaging>,
    chat_id: String,
}

impl SendImageTool {
    pub fn new(messaging: Arc<dyn Messaging>, chat_id: impl Into<String>) -> Self {
        Self {
            messaging,
            chat_id: chat_id.into(),
        }
    }
}

#[async_trait]
impl Tool for SendImageTool {
    fn name(&self) -> &str {
        "send_image"
    }

    fn description(&self) -> &str {
        "Send an image file to the user. Image file size must be under 10 MiB."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "image_path": {
                    "type": "string",
                    "description": "Absolute path to the image file to send."
                }
            },
            "required": ["image_path"]
        })
    }

    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let Some(image_path) = args.get("image_path").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'image_path'"));
        };

        let metadata = match tokio::fs::metadata(image_path).await {
            Ok(m) => m,
            Err(e) => return Ok(error(format!("cannot read '{image_path}': {e}"))),
        };
        if metadata.len() > MAX_IMAGE_BYTES {
            return Ok(error(format!(
                "image '{image_path}' is {} bytes, exceeding the 10 MiB limit",
                metadata.len()
            )));
        }

        match self.messaging.send_image(&self.chat_id, image_path).await {
            Ok(()) => Ok(success(
                json!({"message": format!("Sent image {image_path} to user")}),
            )),
            Err(e) => Ok(error(e.to_string())),
        }
    }
}
