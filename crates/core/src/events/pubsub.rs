//! Pub/sub seam between the engine and the subscription relay.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::errors::Result;

/// Channel buffer depth per subscriber. A lagging subscriber drops the
/// oldest messages; the authoritative state is always the ledger store,
/// never the event stream.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Trait for the channel-addressed publish/subscribe transport.
///
/// Delivery is at-most-once and best-effort: no persistence, no replay,
/// no acknowledgment. A publish with no live subscriber is silently
/// dropped.
#[async_trait]
pub trait PubSubTrait: Send + Sync {
    /// Publishes a payload on a channel. Returns the number of live
    /// subscribers that received it.
    async fn publish(&self, channel: &str, payload: &str) -> Result<usize>;

    /// Opens a subscription to a channel.
    fn subscribe(&self, channel: &str) -> broadcast::Receiver<String>;
}

/// In-process pub/sub on per-channel broadcast channels.
pub struct MemoryPubSub {
    channels: DashMap<String, broadcast::Sender<String>>,
    capacity: usize,
}

impl MemoryPubSub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
        }
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<String> {
        self.channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for MemoryPubSub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PubSubTrait for MemoryPubSub {
    async fn publish(&self, channel: &str, payload: &str) -> Result<usize> {
        // send() errs only when no receiver exists; that is a normal
        // no-subscriber publish, not a failure.
        Ok(self
            .sender(channel)
            .send(payload.to_string())
            .unwrap_or(0))
    }

    fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        self.sender(channel).subscribe()
    }
}
