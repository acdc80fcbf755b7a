//! Gateway — the event loop connecting channels to the routing engine.
//!
//! One logical worker per event stream: channels fan into a single queue and
//! each event is handled to completion before the next. The engine itself is
//! stateless, so nothing here needs a lock; the only shared mutable resource
//! is the document behind the store.

use replybot_core::{
    config::AppConfig, engine, message::IncomingMessage, store::ConfigStore, traits::Channel,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Routes inbound events to at most one outbound reply each.
pub struct Gateway {
    channels: HashMap<String, Arc<dyn Channel>>,
    store: ConfigStore,
    config: AppConfig,
    injector: mpsc::Sender<IncomingMessage>,
    uptime: Instant,
}

impl Gateway {
    pub fn new(
        channels: HashMap<String, Arc<dyn Channel>>,
        store: ConfigStore,
        config: AppConfig,
        injector: mpsc::Sender<IncomingMessage>,
    ) -> Self {
        Self {
            channels,
            store,
            config,
            injector,
            uptime: Instant::now(),
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "replybot gateway running | channels: {} | document: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            self.store.path().display()
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("channel started: {name}");
        }

        // Dashboard + API server runs beside the loop.
        let api_handle = if self.config.dashboard.enabled {
            let state = crate::api::ApiState::new(
                self.config.dashboard.clone(),
                self.store.clone(),
                self.injector.clone(),
                self.uptime,
            );
            Some(tokio::spawn(async move {
                crate::api::serve(state).await;
            }))
        } else {
            None
        };

        drop(tx);

        while let Some(incoming) = rx.recv().await {
            self.handle_message(incoming).await;
        }

        if let Some(handle) = api_handle {
            handle.abort();
        }
        info!("gateway shutting down");
        Ok(())
    }

    /// Process one inbound event: fresh snapshot, route, dispatch.
    pub(crate) async fn handle_message(&self, incoming: IncomingMessage) {
        let preview = if incoming.text.chars().count() > 60 {
            let truncated: String = incoming.text.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            incoming.text.clone()
        };
        info!(
            "[{}] {} says: {}",
            incoming.channel,
            incoming.display_name(),
            preview
        );

        // Fresh snapshot per event: dashboard edits apply without restart.
        let doc = match self.store.load() {
            Ok(doc) => doc,
            Err(e) => {
                error!("failed to load reply configuration: {e}");
                return;
            }
        };

        let Some(action) = engine::route(&incoming, &doc) else {
            debug!("[{}] no action for {}", incoming.channel, incoming.chat_id);
            return;
        };

        match self.channels.get(&incoming.channel) {
            Some(channel) => {
                let destination = action.destination.clone();
                let mode = action.mode;
                if let Err(e) = channel.send(action).await {
                    error!("failed to deliver reply via {}: {e}", incoming.channel);
                } else {
                    info!(
                        "[{}] sent {} reply to {}",
                        incoming.channel,
                        mode.as_str(),
                        destination
                    );
                }
            }
            None => error!("no channel found for '{}'", incoming.channel),
        }
    }
}
