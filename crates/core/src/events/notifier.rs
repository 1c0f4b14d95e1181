//! Change notifier.

use std::sync::Arc;

use log::{debug, error};

use super::change_event::ChangeEvent;
use super::pubsub::PubSubTrait;

/// Publishes change events to the owning user's channel.
///
/// `notify` is fire-and-forget: it never blocks the triggering mutation on
/// delivery and never surfaces a transport failure to the caller. Services
/// must issue cache invalidation before notifying, so a subscriber that
/// re-reads on receipt sees freshly computable state.
pub struct ChangeNotifier {
    pubsub: Arc<dyn PubSubTrait>,
}

impl ChangeNotifier {
    pub fn new(pubsub: Arc<dyn PubSubTrait>) -> Self {
        Self { pubsub }
    }

    /// Publishes the event, payload being the bare resource id.
    pub async fn notify(&self, event: ChangeEvent) {
        let channel = event.channel();
        match self.pubsub.publish(&channel, &event.resource_id).await {
            Ok(receivers) => {
                debug!("published change on {channel} to {receivers} subscribers");
            }
            Err(e) => {
                error!("failed to publish change on {channel}: {e}");
            }
        }
    }
}
