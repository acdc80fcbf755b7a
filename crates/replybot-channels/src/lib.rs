//! # replybot-channels
//!
//! Messaging transport adapters for Replybot.

pub mod bridge;

pub use bridge::BridgeChannel;
