//! SPA navigation detection.

/// Remembers the last seen location and reports real changes.
///
/// History pushes that keep the URL (or re-announce it) are not navigations.
#[derive(Debug, Clone)]
pub struct NavigationTracker {
    last: String,
}

impl NavigationTracker {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            last: location.into(),
        }
    }

    /// Record `current`; `true` when it differs from the last location.
    pub fn observe(&mut self, current: &str) -> bool {
        if self.last == current {
            return false;
        }
        self.last = current.to_string();
        true
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}
