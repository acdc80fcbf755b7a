//! HTTP bridge channel.
//!
//! The messaging-network client itself (session persistence, QR pairing,
//! reconnection) runs as an external sidecar process. Inbound events reach
//! the bot through the `/api/event` webhook, which injects them into this
//! channel; outbound actions are POSTed as JSON to the sidecar's delivery
//! endpoint.

use async_trait::async_trait;
use replybot_core::{
    config::BridgeConfig,
    error::ReplyBotError,
    message::{IncomingMessage, ReplyAction},
    traits::Channel,
};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

pub struct BridgeChannel {
    config: BridgeConfig,
    http: reqwest::Client,
    inbound_tx: mpsc::Sender<IncomingMessage>,
    inbound_rx: Mutex<Option<mpsc::Receiver<IncomingMessage>>>,
}

impl BridgeChannel {
    pub fn new(config: BridgeConfig) -> Self {
        let (tx, rx) = mpsc::channel(64);
        Self {
            config,
            http: reqwest::Client::new(),
            inbound_tx: tx,
            inbound_rx: Mutex::new(Some(rx)),
        }
    }

    /// Sender handle for the webhook route to inject inbound events.
    pub fn injector(&self) -> mpsc::Sender<IncomingMessage> {
        self.inbound_tx.clone()
    }
}

#[async_trait]
impl Channel for BridgeChannel {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, ReplyBotError> {
        let rx = self
            .inbound_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| ReplyBotError::Channel("bridge channel already started".into()))?;
        info!("bridge channel started");
        Ok(rx)
    }

    async fn send(&self, action: ReplyAction) -> Result<(), ReplyBotError> {
        debug!(
            "delivering {} reply to {}",
            action.mode.as_str(),
            action.destination
        );

        let response = self
            .http
            .post(&self.config.deliver_url)
            .json(&action)
            .send()
            .await
            .map_err(|e| ReplyBotError::Channel(format!("bridge delivery failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ReplyBotError::Channel(format!(
                "bridge delivery rejected: HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), ReplyBotError> {
        info!("bridge channel stopped");
        Ok(())
    }
}
