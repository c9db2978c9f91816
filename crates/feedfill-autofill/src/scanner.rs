//! Target scanner: finds comment inputs and throttles them.

use std::collections::HashSet;

use tokio::time::Instant;
use tracing::debug;

use feedfill_config::ScannerConfig;
use feedfill_dom::{Document, NodeRef, Selector};

use crate::error::{AutoFillError, AutoFillResult};
use crate::throttle::ScanThrottle;

/// Enumerates eligible targets in descriptor order.
pub struct TargetScanner {
    document: Document,
    descriptors: Vec<Selector>,
    throttle: ScanThrottle,
}

impl TargetScanner {
    pub fn new(document: Document, config: &ScannerConfig) -> AutoFillResult<Self> {
        let descriptors = config
            .target_selectors
            .iter()
            .map(|s| Selector::parse(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AutoFillError::selector("scanner.target_selectors"))?;

        Ok(Self {
            document,
            descriptors,
            throttle: ScanThrottle::new(config.cooldown()),
        })
    }

    /// Scan with the current time.
    pub fn scan(&mut self) -> Vec<NodeRef> {
        self.scan_at(Instant::now())
    }

    /// Every element matching a descriptor whose cool-down has elapsed at
    /// `now`. An element matched by several descriptors is considered once.
    pub fn scan_at(&mut self, now: Instant) -> Vec<NodeRef> {
        let pruned = self.throttle.prune();
        if pruned > 0 {
            debug!("Pruned {} dead throttle entries", pruned);
        }

        let mut visited = HashSet::new();
        let mut eligible = Vec::new();
        for descriptor in &self.descriptors {
            for node in self.document.query_selector_all(descriptor) {
                if !visited.insert(node.id()) {
                    continue;
                }
                if self.throttle.admit(&node, now) {
                    eligible.push(node);
                }
            }
        }

        if !eligible.is_empty() {
            debug!(
                "Scan found {} eligible of {} matching targets",
                eligible.len(),
                visited.len()
            );
        }
        eligible
    }

    pub fn throttle(&self) -> &ScanThrottle {
        &self.throttle
    }

    pub fn throttle_mut(&mut self) -> &mut ScanThrottle {
        &mut self.throttle
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
