// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod add_reaction;
mod edit_file;
mod fetch;
mod read_file;
mod run_command;
mod send_image;
mod use_skill;
mod web_search;
mod write_file;

pub use add_reaction::AddReactionTool;
pub use edit_file::EditFileTool;
pub use fetch::FetchTool;
pub use read_file::ReadFileTool;
pub use run_command::RunCommandTool;
pub use send_image::SendImageTool;
pub use use_skill::UseSkillTool;
pub use web_search::WebSearchTool;
pub use write_file::WriteFileTool;
