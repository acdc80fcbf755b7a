use crate::{
    error::ReplyBotError,
    message::{IncomingMessage, ReplyAction},
};
use async_trait::async_trait;

/// Messaging transport seam.
///
/// Every transport (the HTTP bridge, test doubles) implements this trait to
/// hand inbound events to the gateway and carry routed replies back out. The
/// decision core never talks to the network itself.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name used for routing and logs.
    fn name(&self) -> &str;

    /// Start listening for incoming events.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, ReplyBotError>;

    /// Deliver one routed reply.
    async fn send(&self, action: ReplyAction) -> Result<(), ReplyBotError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), ReplyBotError>;
}
