//! [`ActionSender`] backed by a tokio channel.
//!
//! The interpreter runs synchronously inside the session loop; this sender
//! hands each action to the session's forwarder task without blocking.

use tokio::sync::mpsc;
use tracing::trace;

use trackpad_core::{Action, ActionSender};

/// Queues actions for the upstream forwarder.
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<Action>,
}

impl ChannelSender {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }
}

impl ActionSender for ChannelSender {
    fn send(&self, action: Action) {
        // Fire-and-forget: a closed forwarder means the session is ending.
        if self.tx.send(action).is_err() {
            trace!("action dropped: forwarder closed");
        }
    }
}
