// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vigil",
    about = "An always-on autonomous agent: event-driven scheduler, tool-using chat loop, heartbeat",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file (overrides auto-discovery across system/user/workspace layers)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// OpenAI-compatible base URL for the LLM endpoint
    #[arg(long, env = "VIGIL_OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Model name to request from the configured endpoint
    #[arg(long, env = "VIGIL_OPENAI_MODEL")]
    pub openai_model: Option<String>,

    /// API key for the configured LLM endpoint
    #[arg(long, env = "VIGIL_OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Container runtime to execute workspace commands in (empty ⇒ run directly on the host)
    #[arg(long, env = "VIGIL_CONTAINER_RUNTIME")]
    pub container_runtime: Option<String>,

    /// Heartbeat period in seconds
    #[arg(long, env = "VIGIL_WAKE_INTERVAL_SECONDS")]
    pub wake_interval_seconds: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the scheduler (and, if enabled, the HTTP ingress) and run until stopped.
    Run,

    /// Print the effective configuration (after merging layers and env overrides) and exit.
    ShowConfig,

    /// Generate a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "vigil", &mut std::io::stdout());
}
