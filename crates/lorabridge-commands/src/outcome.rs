//! Delivery outcome tracking for queued downlinks.
//!
//! Messages taken from a queue have to be settled against that queue.
//! [`TrackedCloudToDeviceMessage`] forwards the scheduler's verdict as a
//! [`DownlinkOutcome`] to whoever owns the queue, and accepts only the
//! first verdict that reaches the channel. A verdict the channel refuses
//! (full or closed) leaves the message unsettled.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::downlink::CloudToDeviceMessage;
use crate::holder::MacCommandHolder;

/// How the scheduler settled a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownlinkDisposition {
    /// Delivered (or consumed); remove from the queue
    Completed,
    /// Not delivered; requeue for a later window
    Abandoned,
}

/// Outcome published for a tracked message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlinkOutcome {
    pub message_id: String,
    pub dev_eui: String,
    pub disposition: DownlinkDisposition,
    pub signaled_at: DateTime<Utc>,
}

/// Message whose outcome is reported on a channel.
pub struct TrackedCloudToDeviceMessage<M> {
    inner: M,
    outcome_tx: mpsc::Sender<DownlinkOutcome>,
    signaled: AtomicBool,
}

impl<M: CloudToDeviceMessage> TrackedCloudToDeviceMessage<M> {
    pub fn new(inner: M, outcome_tx: mpsc::Sender<DownlinkOutcome>) -> Self {
        Self {
            inner,
            outcome_tx,
            signaled: AtomicBool::new(false),
        }
    }

    /// Whether `complete` or `abandon` has already been called.
    pub fn is_settled(&self) -> bool {
        self.signaled.load(Ordering::Acquire)
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn settle(&self, disposition: DownlinkDisposition) -> bool {
        if self.signaled.swap(true, Ordering::AcqRel) {
            debug!(
                message_id = %self.inner.message_id(),
                ?disposition,
                "Downlink already settled, ignoring signal"
            );
            return false;
        }

        let outcome = DownlinkOutcome {
            message_id: self.inner.message_id().to_string(),
            dev_eui: self.inner.dev_eui().to_string(),
            disposition,
            signaled_at: Utc::now(),
        };

        match self.outcome_tx.try_send(outcome) {
            Ok(()) => true,
            Err(e) => {
                // unpublished signals leave the message open for a retry
                self.signaled.store(false, Ordering::Release);
                warn!(
                    message_id = %self.inner.message_id(),
                    ?disposition,
                    "Failed to publish downlink outcome: {}",
                    e
                );
                false
            }
        }
    }
}

#[async_trait]
impl<M: CloudToDeviceMessage> CloudToDeviceMessage for TrackedCloudToDeviceMessage<M> {
    fn dev_eui(&self) -> &str {
        self.inner.dev_eui()
    }

    fn fport(&self) -> u8 {
        self.inner.fport()
    }

    fn body(&self) -> &[u8] {
        self.inner.body()
    }

    fn confirmed(&self) -> bool {
        self.inner.confirmed()
    }

    fn message_id(&self) -> &str {
        self.inner.message_id()
    }

    fn mac_commands(&self) -> Option<&MacCommandHolder> {
        self.inner.mac_commands()
    }

    async fn complete(&self) -> bool {
        self.settle(DownlinkDisposition::Completed)
    }

    async fn abandon(&self) -> bool {
        self.settle(DownlinkDisposition::Abandoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downlink::DirectCloudToDeviceMessage;

    #[tokio::test]
    async fn test_first_signal_wins() {
        let (tx, mut rx) = mpsc::channel(4);
        let message = TrackedCloudToDeviceMessage::new(
            DirectCloudToDeviceMessage::new("01", 1, vec![1]).with_message_id("m-1"),
            tx,
        );

        assert!(!message.is_settled());
        assert!(message.abandon().await);
        assert!(message.is_settled());
        assert!(!message.complete().await);
        assert!(!message.abandon().await);

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.message_id, "m-1");
        assert_eq!(outcome.disposition, DownlinkDisposition::Abandoned);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_channel_rejects_signal() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let message =
            TrackedCloudToDeviceMessage::new(DirectCloudToDeviceMessage::new("01", 1, vec![]), tx);
        assert!(!message.complete().await);
        assert!(!message.is_settled());
    }

    #[tokio::test]
    async fn test_full_channel_allows_retry() {
        let (tx, mut rx) = mpsc::channel(1);
        let first = TrackedCloudToDeviceMessage::new(
            DirectCloudToDeviceMessage::new("01", 1, vec![]).with_message_id("m-1"),
            tx.clone(),
        );
        let second = TrackedCloudToDeviceMessage::new(
            DirectCloudToDeviceMessage::new("02", 1, vec![]).with_message_id("m-2"),
            tx,
        );

        assert!(first.complete().await);
        assert!(!second.complete().await);
        assert!(!second.is_settled());

        assert_eq!(rx.recv().await.unwrap().message_id, "m-1");

        assert!(second.abandon().await);
        assert!(second.is_settled());
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.message_id, "m-2");
        assert_eq!(outcome.dev_eui, "02");
        assert_eq!(outcome.disposition, DownlinkDisposition::Abandoned);
    }
}
