//! Per-element cool-down side table.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::time::Instant;

use feedfill_dom::{Node, NodeId, NodeRef};

/// Leading-edge throttle keyed by node identity.
///
/// Entries hold only a weak reference, so the table never keeps a removed
/// element alive; dead entries are dropped by [`ScanThrottle::prune`].
#[derive(Debug)]
pub struct ScanThrottle {
    cooldown: Duration,
    last_seen: HashMap<NodeId, (Weak<Node>, Instant)>,
}

impl ScanThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_seen: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether `node` may be yielded at `now`. An admitted node is stamped
    /// with `now`; a throttled one keeps its previous stamp.
    pub fn admit(&mut self, node: &NodeRef, now: Instant) -> bool {
        if let Some((weak, last)) = self.last_seen.get(&node.id()) {
            if weak.strong_count() > 0 && now.saturating_duration_since(*last) < self.cooldown {
                return false;
            }
        }
        self.last_seen
            .insert(node.id(), (Arc::downgrade(node), now));
        true
    }

    /// Drop entries whose element no longer exists.
    pub fn prune(&mut self) -> usize {
        let before = self.last_seen.len();
        self.last_seen.retain(|_, (weak, _)| weak.strong_count() > 0);
        before - self.last_seen.len()
    }

    /// Forget `id` so its next scan is admitted immediately.
    pub fn forget(&mut self, id: NodeId) {
        self.last_seen.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

#[cfg(test)]
#[path = "throttle_tests.rs"]
mod tests;
