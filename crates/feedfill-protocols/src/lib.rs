//! # FeedFill Protocols
//!
//! Core protocol definitions (traits) for the FeedFill auto-fill coordinator.
//! Contains only interface definitions and the small value types they share.
//!
//! ## Core Traits
//!
//! - [`Generator`] - Produces comment text for a post
//! - [`SettingsStore`] - Async key/value settings with change notifications
//! - [`Prompter`] - Asks the user for a free-text instruction

pub mod error;
pub mod generator;
pub mod prompt;
pub mod settings;
pub mod types;

// Re-export core traits
pub use generator::{GenerationRequest, Generator};
pub use prompt::Prompter;
pub use settings::{auto_comments_enabled, SettingsChange, SettingsStore, AUTO_COMMENTS_KEY};
pub use error::{GeneratorError, SettingsError};
pub use types::PostContext;
