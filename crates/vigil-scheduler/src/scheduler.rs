// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use vigil_core::{Agent, Conversation, HeartbeatOrchestrator, HumanInputOrchestrator, Orchestrator, PromptBuilder};
use vigil_model::{ChatMessage, EventLog, Messaging, NullEventLog};
use vigil_tools::ToolRegistry;

use crate::event::{Event, EventSender};

const NEW_SESSION_COMMAND: &str = "/new";
const HEARTBEAT_COMMAND: &str = "/heartbeat";
const COMPRESS_COMMAND: &str = "/compress";

/// Single-consumer event loop: owns the Conversations map, arms the next
/// heartbeat after every processed event, and selects an Orchestrator per
/// event class. Exactly one `Scheduler::run` future drains the queue, so
/// per-chat_id state never needs a lock.
pub struct Scheduler {
    agent: Arc<Agent>,
    tool_registry: ToolRegistry,
    messaging: Arc<dyn Messaging>,
    event_log: Arc<dyn EventLog>,
    prompt_builder: Arc<PromptBuilder>,
    context_max_tokens: u64,
    wake_interval: Duration,
    conversations: HashMap<String, Conversation>,
    events_tx: EventSender,
    events_rx: mpsc::UnboundedReceiver<Event>,
    heartbeat_arm: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(
        agent: Arc<Agent>,
        tool_registry: ToolRegistry,
        messaging: Arc<dyn Messaging>,
        prompt_builder: Arc<PromptBuilder>,
        context_max_tokens: u64,
        wake_interval: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            agent,
            tool_registry,
            messaging,
            event_log: Arc::new(NullEventLog),
            prompt_builder,
            context_max_tokens,
            wake_interval,
            conversations: HashMap::new(),
            events_tx,
            events_rx,
            heartbeat_arm: None,
        }
    }

    /// Attach a non-default side-channel logger (the default is a no-op).
    pub fn with_event_log(mut self, event_log: Arc<dyn EventLog>) -> Self {
        self.event_log = event_log;
        self
    }

    /// A sender clone for the HTTP ingress / messaging adapter to enqueue
    /// events onto this scheduler's queue from outside the loop.
    pub fn sender(&self) -> EventSender {
        self.events_tx.clone()
    }

    /// Drains the event queue forever. Returns once the queue is closed
    /// (every sender, including `self`'s own clone kept alive by callers,
    /// has been dropped).
    pub async fn run(mut self) {
        info!("scheduler starting");
        while let Some(event) = self.events_rx.recv().await {
            if let Some(handle) = self.heartbeat_arm.take() {
                handle.abort();
            }

            if let Err(e) = self.dispatch(event).await {
                error!(error = %e, "error during event processing");
                if let Err(notify_err) = self
                    .messaging
                    .notify(&format!("Error during event processing: {e}"))
                    .await
                {
                    warn!(error = %notify_err, "failed to notify about event-processing error");
                }
            }

            self.arm_heartbeat();
        }
        if let Some(handle) = self.heartbeat_arm.take() {
            handle.abort();
        }
        info!("scheduler stopped");
    }

    fn arm_heartbeat(&mut self) {
        let tx = self.events_tx.clone();
        let wake_interval = self.wake_interval;
        self.heartbeat_arm = Some(tokio::spawn(async move {
            tokio::time::sleep(wake_interval).await;
            let _ = tx.send(Event::Heartbeat);
        }));
    }

    async fn dispatch(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Heartbeat => self.dispatch_heartbeat().await,
            Event::HumanInput {
                chat_id,
                message_id,
                message,
            } => self.dispatch_human_input(chat_id, message_id, message).await,
        }
    }

    /// Heartbeats are stateless: no Conversation is read, created, or
    /// mutated for them.
    async fn dispatch_heartbeat(&mut self) -> anyhow::Result<()> {
        let prompt = self.prompt_builder.build("");
        let now = chrono::Local::now();
        let user_message = ChatMessage::user(format!(
            "Current Time: {}\nTimezone: {}\nSYSTEM EVENT: Heartbeat",
            now.format("%Y-%m-%d %H:%M:%S"),
            now.format("%Z")
        ));

        let orchestrator = Orchestrator::Heartbeat(
            HeartbeatOrchestrator::new(self.tool_registry.clone(), self.messaging.clone())
                .with_event_log(self.event_log.clone()),
        );

        debug!("dispatching heartbeat event");
        self.agent.run(prompt, vec![user_message], &orchestrator).await?;
        Ok(())
    }

    async fn dispatch_human_input(
        &mut self,
        chat_id: String,
        message_id: String,
        message: String,
    ) -> anyhow::Result<()> {
        match message.as_str() {
            NEW_SESSION_COMMAND => {
                self.conversations
                    .insert(chat_id.clone(), Conversation::new(chat_id.clone()));
                self.messaging
                    .send_message(&chat_id, "New session started")
                    .await?;
                return Ok(());
            }
            HEARTBEAT_COMMAND => {
                let _ = self.events_tx.send(Event::Heartbeat);
                self.messaging
                    .send_message(&chat_id, "New heartbeat started")
                    .await?;
                return Ok(());
            }
            COMPRESS_COMMAND => {
                self.handle_compress_command(&chat_id).await?;
                return Ok(());
            }
            _ => {}
        }

        let conversation = self
            .conversations
            .entry(chat_id.clone())
            .or_insert_with(|| Conversation::new(chat_id.clone()));

        if conversation.has_processed(&message_id) {
            debug!(chat_id = %chat_id, message_id = %message_id, "dropping already-processed message");
            return Ok(());
        }
        conversation.mark_processed(message_id.clone());

        let now = chrono::Local::now();
        conversation.push(ChatMessage::user(format!(
            "Message Time: {}\nTimezone: {}\n\n{}",
            now.format("%Y-%m-%d %H:%M:%S"),
            now.format("%Z"),
            message
        )));

        let prompt = self.prompt_builder.build(&conversation.previous_summary);
        let orchestrator = Orchestrator::HumanInput(
            HumanInputOrchestrator::new(
                self.tool_registry.clone(),
                self.messaging.clone(),
                chat_id.clone(),
                message_id,
            )
            .with_event_log(self.event_log.clone()),
        );

        debug!(chat_id = %chat_id, "dispatching human input event");
        let outcome = self
            .agent
            .run(prompt, conversation.messages.clone(), &orchestrator)
            .await?;

        let conversation = self
            .conversations
            .get_mut(&chat_id)
            .expect("conversation inserted above");
        conversation.messages = outcome.messages;
        conversation.total_tokens = outcome.response.usage.total_tokens;
        Ok(())
    }

    async fn handle_compress_command(&mut self, chat_id: &str) -> anyhow::Result<()> {
        let conversation = self
            .conversations
            .entry(chat_id.to_string())
            .or_insert_with(|| Conversation::new(chat_id.to_string()));

        if conversation.total_tokens < self.context_max_tokens {
            let total_tokens = conversation.total_tokens;
            self.messaging
                .send_message(
                    chat_id,
                    &format!("No need to compress, total tokens: {total_tokens}"),
                )
                .await?;
            return Ok(());
        }

        let summary = self.agent.compress(&conversation.messages).await?;
        let conversation = self
            .conversations
            .get_mut(chat_id)
            .expect("conversation inserted above");
        conversation.previous_summary = summary;
        conversation.reset_messages();

        self.messaging
            .send_message(chat_id, "Conversation compressed")
            .await?;
        Ok(())
    }
}
