//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notify::{Notifier, NotifyError};

/// A delivered notification, recorded for assertions.
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub recipient_id: i64,
    pub message: String,
}

/// Mock implementation of the Notifier trait.
///
/// Records every delivery; can be switched into failure mode to verify that
/// callers treat notifications as best-effort.
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<SentNotification>>>,
    failing: Arc<RwLock<bool>>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(false)),
        }
    }

    /// Make every subsequent delivery fail.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// All notifications delivered so far.
    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.read().await.clone()
    }

    /// Notifications delivered to one recipient.
    pub async fn sent_to(&self, recipient_id: i64) -> Vec<SentNotification> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, recipient_id: i64, message: &str) -> Result<(), NotifyError> {
        if *self.failing.read().await {
            return Err(NotifyError::Rejected("mock failure".to_string()));
        }

        self.sent.write().await.push(SentNotification {
            recipient_id,
            message: message.to_string(),
        });

        Ok(())
    }
}
