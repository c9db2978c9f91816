//! Feed mutation watcher.
//!
//! Keeps at most one live [`MutationSubscription`] on the feed container and
//! swaps it when the container is replaced (SPA navigation re-renders it).

use std::sync::{Arc, Weak};

use tracing::{debug, info};

use feedfill_config::WatcherConfig;
use feedfill_dom::{Document, MutationRecord, MutationSubscription, Node, NodeId, NodeRef, Selector};

use crate::error::{AutoFillError, AutoFillResult};

pub struct FeedWatcher {
    document: Document,
    root_selector: Selector,
    root: Option<(NodeId, Weak<Node>)>,
    subscription: Option<MutationSubscription>,
}

impl FeedWatcher {
    pub fn new(document: Document, config: &WatcherConfig) -> AutoFillResult<Self> {
        let root_selector = Selector::parse(&config.root_selector)
            .map_err(AutoFillError::selector("watcher.root_selector"))?;
        Ok(Self {
            document,
            root_selector,
            root: None,
            subscription: None,
        })
    }

    /// Query the feed container afresh and bind to it.
    pub fn rebind(&mut self) -> bool {
        let candidate = self.document.query_selector(&self.root_selector);
        self.bind_root(candidate)
    }

    /// Bind to `candidate`. Returns whether the binding changed.
    ///
    /// The old subscription is dropped before the new one is created, so at
    /// most one is ever live. `None` makes the watcher dormant.
    pub fn bind_root(&mut self, candidate: Option<NodeRef>) -> bool {
        let current = self.root();
        let same = match (&current, &candidate) {
            (Some(a), Some(b)) => a.id() == b.id(),
            (None, None) => true,
            _ => false,
        };
        if same && (candidate.is_none() || self.subscription.is_some()) {
            return false;
        }

        self.subscription = None;
        match candidate {
            Some(root) => {
                info!("Feed watcher bound to {}", root.id());
                self.subscription = Some(self.document.observe(&root));
                self.root = Some((root.id(), Arc::downgrade(&root)));
            }
            None => {
                if self.root.is_some() {
                    info!("Feed container gone, watcher dormant");
                }
                self.root = None;
            }
        }
        true
    }

    /// Release the subscription and forget the root.
    pub fn dispose(&mut self) {
        if self.subscription.take().is_some() {
            debug!("Feed watcher disposed");
        }
        self.root = None;
    }

    /// The bound container, if it is still alive.
    pub fn root(&self) -> Option<NodeRef> {
        self.root.as_ref().and_then(|(_, weak)| weak.upgrade())
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root.as_ref().map(|(id, _)| *id)
    }

    pub fn is_bound(&self) -> bool {
        self.subscription.is_some()
    }

    /// Wait for the next burst of mutations under the root.
    ///
    /// Never resolves while dormant. A subscription that closes (its root was
    /// freed) turns the watcher dormant.
    pub async fn next_batch(&mut self) -> Vec<MutationRecord> {
        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                return std::future::pending().await;
            };
            let batch = subscription.next_batch().await;
            match batch {
                Some(batch) => return batch,
                None => {
                    debug!("Feed subscription closed");
                    self.subscription = None;
                    self.root = None;
                }
            }
        }
    }

    /// Records queued since the last batch, without waiting.
    pub fn drain(&mut self) -> Vec<MutationRecord> {
        self.subscription
            .as_mut()
            .map(MutationSubscription::take_pending)
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for FeedWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedWatcher")
            .field("root_selector", &self.root_selector.as_str())
            .field("root", &self.root_id())
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
