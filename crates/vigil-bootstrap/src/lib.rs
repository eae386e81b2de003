// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod event_logger;
mod null_messaging;

pub use event_logger::{EventLogger, EventSink};
pub use null_messaging::NullMessaging;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use vigil_config::Config;
use vigil_core::{Agent, PromptBuilder};
use vigil_model::{Messaging, ModelProvider};
use vigil_runtime::Runtime;
use vigil_scheduler::Scheduler;
use vigil_tools::{register_default_tools, SkillLoader};

/// Wires every collaborator together and runs the process until the
/// scheduler's event loop exits (it never does on its own — only a signal
/// handler closing the sender side, or the process being killed, ends it).
///
/// `model` is the one collaborator this crate cannot default: no concrete
/// LLM HTTP client ships here, so callers supply whatever `ModelProvider`
/// fits their deployment. `messaging` defaults to `NullMessaging` unless the
/// caller has a real chat adapter to hand in.
pub async fn run(
    config: Config,
    model: Arc<dyn ModelProvider>,
    messaging: Option<Arc<dyn Messaging>>,
) -> anyhow::Result<()> {
    let runtime = Arc::new(Runtime::new(
        config.runtime.container_runtime().unwrap_or(""),
        &config.runtime.container_name,
        &config.runtime.workspace_dir,
    ));
    let skills = Arc::new(SkillLoader::new(&config.runtime.skills_dir));
    let tool_registry = register_default_tools(
        runtime,
        skills.clone(),
        Duration::from_secs(config.agent.tool_timeout),
    );
    let prompt_builder = Arc::new(PromptBuilder::new(&config.runtime.workspace_dir, skills));
    let messaging = messaging.unwrap_or_else(|| Arc::new(NullMessaging));
    let agent = Arc::new(Agent::new(model));

    // No stream-sink URL is part of `Config` (§6 leaves the logger's wire
    // format out of the core's contract), so this always drains to `tracing`.
    let (event_logger, event_logger_handle) = EventLogger::start(None);
    let event_logger = Arc::new(event_logger);

    let scheduler = Scheduler::new(
        agent,
        tool_registry,
        messaging,
        prompt_builder,
        config.agent.context_max_tokens as u64,
        Duration::from_secs(config.agent.wake_interval_seconds),
    )
    .with_event_log(event_logger);
    let events_tx = scheduler.sender();

    let gateway_handle = if config.api.enabled {
        let app = vigil_gateway::router(events_tx);
        let addr = format!("{}:{}", config.api.host, config.api.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(%addr, "HTTP ingress listening");
        Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "gateway server exited");
            }
        }))
    } else {
        info!("HTTP ingress disabled (api.enabled = false)");
        None
    };

    scheduler.run().await;

    if let Some(handle) = gateway_handle {
        handle.abort();
    }
    event_logger_handle.abort();
    Ok(())
}
