//! User notification transport.
//!
//! Notifications are best-effort from the core's perspective: a failed
//! delivery is logged and counted but never rolls back the state change
//! that triggered it.

mod telegram;

pub use telegram::{TelegramConfig, TelegramNotifier};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Transport rejected the message: {0}")]
    Rejected(String),

    #[error("Transport not configured: {0}")]
    NotConfigured(String),
}

/// Trait for notification transports.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message to a recipient. Fire-and-forget for callers.
    async fn notify(&self, recipient_id: i64, message: &str) -> Result<(), NotifyError>;
}

/// Notifier that only logs, for deployments without a messaging transport.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipient_id: i64, message: &str) -> Result<(), NotifyError> {
        tracing::info!(recipient_id, message, "notification (log only)");
        Ok(())
    }
}
