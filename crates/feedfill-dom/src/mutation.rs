//! Child-list mutation observers.

use std::sync::{Arc, Weak};

use tokio::sync::mpsc;
use tracing::debug;

use crate::document::DocumentInner;
use crate::node::{Node, NodeId, NodeRef};

/// One child-list change under an observed subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Node whose children changed.
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
}

/// Registered observers of a document.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    entries: Vec<ObserverEntry>,
}

struct ObserverEntry {
    id: u64,
    scope: Weak<Node>,
    sender: mpsc::UnboundedSender<MutationRecord>,
}

impl ObserverRegistry {
    pub(crate) fn register(
        &mut self,
        scope: &NodeRef,
        sender: mpsc::UnboundedSender<MutationRecord>,
    ) -> u64 {
        self.next_id += 1;
        self.entries.push(ObserverEntry {
            id: self.next_id,
            scope: Arc::downgrade(scope),
            sender,
        });
        self.next_id
    }

    pub(crate) fn unregister(&mut self, id: u64) {
        self.entries.retain(|e| e.id != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver `record` to every observer whose scope contains `target`.
    pub(crate) fn dispatch(&mut self, target: &Node, record: &MutationRecord) {
        self.entries.retain(|entry| {
            // a dead scope can never match again
            let Some(scope) = entry.scope.upgrade() else {
                return false;
            };
            if scope.id() != target.id() && !scope.is_ancestor_of(target) {
                return true;
            }
            entry.sender.send(record.clone()).is_ok()
        });
    }
}

/// A live child-list subscription on a subtree.
///
/// Dropping the subscription disconnects it; no record is delivered after
/// that.
pub struct MutationSubscription {
    id: u64,
    scope: NodeId,
    receiver: mpsc::UnboundedReceiver<MutationRecord>,
    document: Weak<DocumentInner>,
}

impl MutationSubscription {
    pub(crate) fn new(
        id: u64,
        scope: NodeId,
        receiver: mpsc::UnboundedReceiver<MutationRecord>,
        document: Weak<DocumentInner>,
    ) -> Self {
        Self {
            id,
            scope,
            receiver,
            document,
        }
    }

    /// Root of the observed subtree.
    pub fn scope(&self) -> NodeId {
        self.scope
    }

    /// Wait for the next burst of records.
    ///
    /// Everything queued when the first record arrives is returned together.
    /// `None` once the document is gone.
    pub async fn next_batch(&mut self) -> Option<Vec<MutationRecord>> {
        let first = self.receiver.recv().await?;
        let mut batch = vec![first];
        batch.extend(self.take_pending());
        Some(batch)
    }

    /// Drain queued records without waiting.
    pub fn take_pending(&mut self) -> Vec<MutationRecord> {
        let mut pending = Vec::new();
        while let Ok(record) = self.receiver.try_recv() {
            pending.push(record);
        }
        pending
    }
}

impl Drop for MutationSubscription {
    fn drop(&mut self) {
        if let Some(document) = self.document.upgrade() {
            document.observers().lock().unregister(self.id);
            debug!("Mutation subscription {} on {} disconnected", self.id, self.scope);
        }
    }
}
