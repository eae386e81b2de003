// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;
use std::sync::Arc;

use vigil_tools::SkillLoader;

const BOOTSTRAP_FILES: &[&str] = &["IDENTITY.md", "USER.md", "MEMORY.md", "CONTEXT.md"];

/// Host OS label matching the reference agent's `platform.system()` text
/// (`"Linux"`, `"Darwin"`, `"Windows"`) rather than Rust's lowercase
/// `std::env::consts::OS`.
fn host_os_label() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        other => other,
    }
}

/// Assembles the system prompt handed to every `Agent::run` call from the
/// workspace's bootstrap files, the available skills, and (for human-input
/// events) a compressed conversation summary.
pub struct PromptBuilder {
    workspace_dir: PathBuf,
    skill_loader: Arc<SkillLoader>,
}

impl PromptBuilder {
    pub fn new(workspace_dir: impl Into<PathBuf>, skill_loader: Arc<SkillLoader>) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
            skill_loader,
        }
    }

    pub fn build(&self, previous_summary: &str) -> String {
        let mut bootstrap_context = String::new();
        for filename in BOOTSTRAP_FILES {
            let path = self.workspace_dir.join(filename);
            if let Ok(content) = std::fs::read_to_string(&path) {
                if !content.is_empty() {
                    bootstrap_context.push_str(&format!("# {filename}\n\n{content}\n\n"));
                }
            }
        }

        let skill_summaries = self.skill_loader.discover_skills();
        let mut skills_text = String::new();
        if !skill_summaries.is_empty() {
            skills_text.push_str("Available specialized skills:\n");
            for s in &skill_summaries {
                skills_text.push_str(&format!("- {}: {}\n", s.name, s.description));
            }
            skills_text.push_str("\nUse the `use_skill` tool for detailed instructions.");
        }

        let mut summary_section = String::new();
        if !previous_summary.is_empty() {
            summary_section = format!(
                "# Conversation Summary\n\nThe following is a compressed summary of the conversation history so far:\n\n{previous_summary}\n"
            );
        }

        format!(
            "\nYou are an autonomous agent acting as a personal assistant.\n\n\
**Host Environment:** {os}\n\
**Directory:** `/workspace`\n\n\
You are provided with a set of tools and skills to help you with your tasks.\n\
You can use them to interact with the world or guide yourself to perform actions.\n\n\
# Skills\n\n\
{skills_text}\n\n\
# Workspace\n\n\
Your working directory is `/workspace`.\n\
Treat this directory as the single global workspace for file operations unless explicitly instructed otherwise.\n\n\
{bootstrap_context}\n\n\
{summary_section}\n\n\
# Silent Replies\n\n\
If you are woken up because of a heartbeat, and there is nothing that needs attention, respond with content ends with: NO_REPORT\n\n\
Rules:\n\
- System treats response ending with NO_REPORT as \"no need to report\" and will not send it to human user.\n\
- NO_REPORT must be at the end\n\
- Never append it to an actual response (never include NO_REPORT in real replies)\n\
- Never wrap it in markdown or code blocks\n\n\
Wrong: NO_REPORT There's nothing to report\n\
Wrong: There's nothing to report... `NO_REPORT`\n\
Wrong: \"NO_REPORT\"\n\
Wrong: I need to bring this up with the user... NO_REPORT\n\
Right: NO_REPORT\n\
Right: Nothing needs human attention because... NO_REPORT\n\
Right: Something happened...\n",
            os = host_os_label(),
        )
    }
}
