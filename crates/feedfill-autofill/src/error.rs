//! Error types for the auto-fill coordinator.

use thiserror::Error;

use feedfill_dom::{DomError, NodeId};
use feedfill_protocols::{GeneratorError, SettingsError};

/// Errors that can occur while filling a target.
///
/// None of these reach the watcher or scanner: each fill runs in its own task
/// and logs its error.
#[derive(Debug, Error)]
pub enum AutoFillError {
    /// A configured selector failed to parse.
    #[error("Invalid selector for {field}: {source}")]
    Selector {
        field: &'static str,
        #[source]
        source: DomError,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    /// The target has no parent element to host its controls.
    #[error("Target {0} is detached from the page")]
    Detached(NodeId),

    #[error("Post composer not found, open the composer first")]
    ComposerNotFound,
}

impl AutoFillError {
    pub(crate) fn selector(field: &'static str) -> impl FnOnce(DomError) -> Self {
        move |source| AutoFillError::Selector { field, source }
    }
}

/// Result type for auto-fill operations.
pub type AutoFillResult<T> = Result<T, AutoFillError>;
