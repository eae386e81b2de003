// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use vigil_model::{ModelProvider, StubModelProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Commands::Completions { shell }) = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let mut config = vigil_config::load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, &cli);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::ShowConfig => {
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            Ok(())
        }
        Commands::Completions { .. } => unreachable!("handled above"),
        Commands::Run => {
            let model = default_model_provider(&config);
            vigil_bootstrap::run(config, model, None).await
        }
    }
}

/// CLI flags take priority over every config layer, matching the
/// `VIGIL_`-prefixed environment overrides `vigil_config::loader` already
/// applies — a flag is just another way to set the same value.
fn apply_cli_overrides(config: &mut vigil_config::Config, cli: &Cli) {
    if let Some(v) = &cli.openai_base_url {
        config.model.openai_base_url = v.clone();
    }
    if let Some(v) = &cli.openai_model {
        config.model.openai_model = v.clone();
    }
    if let Some(v) = &cli.openai_api_key {
        config.model.openai_api_key = v.clone();
    }
    if let Some(v) = &cli.container_runtime {
        config.runtime.container_runtime = v.clone();
    }
    if let Some(v) = cli.wake_interval_seconds {
        config.agent.wake_interval_seconds = v;
    }
}

/// The concrete LLM HTTP client is an external collaborator this crate does
/// not implement (see `ModelProvider`'s own doc comment); `StubModelProvider`
/// is the only concrete provider that ships here. A deployment that needs a
/// real model wires its own `ModelProvider` in place of this default before
/// calling `vigil_bootstrap::run`.
fn default_model_provider(config: &vigil_config::Config) -> Arc<dyn ModelProvider> {
    warn!(
        provider = %config.model.provider,
        model = %config.model.openai_model,
        "no concrete LLM client is wired in; running with a no-op stub provider"
    );
    Arc::new(StubModelProvider::new())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
