// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;

use crate::types::{CompletionRequest, CompletionResponse};

/// The Rust-native trait boundary standing in for the out-of-scope concrete
/// LLM HTTP client. Streaming is a non-goal: `complete` drains whatever the
/// concrete backend produces into a single assembled response before
/// returning, so callers never see partial/incremental output.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> anyhow::Result<CompletionResponse>;
}
