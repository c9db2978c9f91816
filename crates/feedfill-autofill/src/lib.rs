//! # FeedFill Auto-Fill
//!
//! Watches a live feed for new comment boxes and fills each one exactly once.
//!
//! ## Components
//!
//! - [`FeedWatcher`] - one mutation subscription on the feed container,
//!   swapped when the container is replaced
//! - [`TargetScanner`] - finds comment boxes and applies a per-element
//!   cool-down ([`ScanThrottle`])
//! - [`FillCoordinator`] - resolves the post, generates, writes, marks and
//!   attaches the regenerate/refine controls
//! - [`AutoFillRuntime`] - the driver loop tying them together
//! - [`PostComposer`] - inserts text into the page's post editor

mod affordance;
mod composer;
mod content;
mod context;
mod coordinator;
mod error;
mod navigation;
mod runtime;
mod scanner;
mod throttle;
mod watcher;

#[cfg(test)]
mod test_support;

pub use affordance::{AffordanceKind, Affordances, BusyGuard, STYLESHEET_ID};
pub use composer::PostComposer;
pub use content::{read_content, write_content};
pub use context::ContextResolver;
pub use coordinator::{FillCoordinator, FillOutcome};
pub use error::{AutoFillError, AutoFillResult};
pub use navigation::NavigationTracker;
pub use runtime::{AutoFillRuntime, RunStats};
pub use scanner::TargetScanner;
pub use throttle::ScanThrottle;
pub use watcher::FeedWatcher;
