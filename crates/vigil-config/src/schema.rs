// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Top-level agent mode. The spec's tool set is mode-independent, but the
/// field is kept since it costs nothing to carry and downstream consumers
/// (CLI, future tool filtering) may still want it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentMode {
    #[default]
    Agent,
    Research,
    Plan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_api_key: String,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model_name() -> String {
    "gpt-4o".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai_base_url: default_base_url(),
            openai_model: default_model_name(),
            openai_api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub container_name: String,
    pub container_runtime: String,
    pub cwd: String,
    pub workspace_dir: String,
    pub skills_dir: String,
}

fn default_container_name() -> String {
    "vigil-workspace".to_string()
}
fn default_workspace_dir() -> String {
    "./workspace".to_string()
}
fn default_skills_dir() -> String {
    "./workspace/.skills".to_string()
}
fn default_cwd() -> String {
    ".".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            container_name: default_container_name(),
            // Empty runtime ⇒ Host.
            container_runtime: String::new(),
            cwd: default_cwd(),
            workspace_dir: default_workspace_dir(),
            skills_dir: default_skills_dir(),
        }
    }
}

impl RuntimeConfig {
    /// `None` when no container runtime is configured (Host variant).
    pub fn container_runtime(&self) -> Option<&str> {
        if self.container_runtime.is_empty() {
            None
        } else {
            Some(&self.container_runtime)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub wake_interval_seconds: u64,
    pub tool_timeout: u64,
    pub context_max_tokens: usize,
}

fn default_wake_interval() -> u64 {
    1800
}
fn default_tool_timeout() -> u64 {
    60
}
fn default_context_max_tokens() -> usize {
    30_000
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            wake_interval_seconds: default_wake_interval(),
            tool_timeout: default_tool_timeout(),
            context_max_tokens: default_context_max_tokens(),
        }
    }
}

/// Messaging adapter credentials. Absent credentials ⇒ Null messaging.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MessagingConfig {
    pub app_id: String,
    pub app_secret: String,
    pub encrypt_key: String,
    pub verification_token: String,
    pub notify_channel_id: String,
}

impl MessagingConfig {
    /// Credentials are considered present only when the two fields that
    /// gate any outbound call (app_id/app_secret) are both non-empty.
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty() && !self.app_secret.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

fn default_api_host() -> String {
    "127.0.0.1".to_string()
}
fn default_api_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub mode: AgentMode,
    pub model: ModelConfig,
    pub runtime: RuntimeConfig,
    pub agent: AgentConfig,
    pub messaging: MessagingConfig,
    pub api: ApiConfig,
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
