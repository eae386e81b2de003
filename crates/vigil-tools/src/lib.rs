// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
pub mod builtin;
pub mod registry;
pub mod skill_loader;
pub mod tool;

use std::sync::Arc;
use std::time::Duration;

pub use builtin::{
    AddReactionTool, EditFileTool, FetchTool, ReadFileTool, RunCommandTool, SendImageTool,
    UseSkillTool, WebSearchTool, WriteFileTool,
};
pub use registry::ToolRegistry;
pub use skill_loader::SkillLoader;
pub use tool::{error, success, Tool, ToolCall};

use vigil_model::Messaging;
use vigil_runtime::Runtime;

/// Builds the registry every Orchestrator starts from: filesystem, shell,
/// search, and skill tools with no chat-message scope. Orchestrators that
/// handle a human-input event add `add_reaction`/`send_image` on top via
/// `register_human_input_tools`.
pub fn register_default_tools(
    runtime: Arc<Runtime>,
    skill_loader: Arc<SkillLoader>,
    tool_timeout: Duration,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new(tool_timeout);
    registry.register(RunCommandTool::new(runtime.clone()));
    registry.register(WriteFileTool::new(runtime.clone()));
    registry.register(ReadFileTool::new(runtime.clone()));
    registry.register(EditFileTool::new(runtime));
    registry.register(WebSearchTool::new());
    registry.register(FetchTool);
    registry.register(UseSkillTool::new(skill_loader));
    registry
}

/// Adds the tools that only make sense while replying to a specific chat
/// message — instance-scoped to `chat_id`/`message_id`, never shared across
/// Orchestrators.
pub fn register_human_input_tools(
    registry: &mut ToolRegistry,
    messaging: Arc<dyn Messaging>,
    chat_id: impl Into<String>,
    message_id: impl Into<String>,
) {
    let chat_id = chat_id.into();
    let message_id = message_id.into();
    registry.register(AddReactionTool::new(messaging.clone(), message_id));
    registry.register(SendImageTool::new(messaging, chat_id));
}
