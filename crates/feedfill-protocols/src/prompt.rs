//! User prompt protocol.

use async_trait::async_trait;

/// Asks the user for a free-text answer.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Show `message` with `default` prefilled. `None` means the user cancelled.
    async fn prompt(&self, message: &str, default: &str) -> Option<String>;
}
