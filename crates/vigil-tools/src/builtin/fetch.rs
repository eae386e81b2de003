// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::tool::{error, success, Tool};

const DEFAULT_MAX_CHARS: usize = 50_000;

/// Fetches and extracts the readable text content of a web page.
pub struct FetchTool;

#[async_trait]
impl Tool for FetchTool {
    fn name(&self) -> &str {
        "fetch"
    }

    fn description(&self) -> &str {
        "Fetches and extracts the main content from a web page. Returns the \
         extracted text content from the URL."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the web page to fetch."
                }
            },
            "required": ["url"]
        })
    }

    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let Some(url) = args.get("url").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'url'"));
        };

        debug!(url, "fetch tool");
        match fetch_url(url, DEFAULT_MAX_CHARS).await {
            Ok(output) => Ok(success(json!({"output": output}))),
            Err(e) => Ok(error(format!("fetch error: {e}"))),
        }
    }
}

async fn fetch_url(url: &str, max_chars: usize) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .redirect(reqwest::redirect::Policy::limited(3))
        .build()?;

    let response = client.get(url).send().await?;
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    let body = response.text().await?;

    let content = if content_type.contains("html") {
        html_to_text(&body)
    } else if content_type.contains("json") {
        match serde_json::from_str::<Value>(&body) {
            Ok(v) => serde_json::to_string_pretty(&v).unwrap_or(body),
            Err(_) => body,
        }
    } else {
        body
    };

    Ok(truncate_chars(&content, max_chars))
}

fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 100)
}

fn truncate_chars(content: &str, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content.to_string();
    }
    let truncated: String = content.chars().take(max_chars).collect();
    format!(
        "{truncated}\n... [truncated, {max_chars} of {total} chars shown]"
    )
}
