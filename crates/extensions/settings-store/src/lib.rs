//! Settings stores for FeedFill.
//!
//! - [`MemorySettingsStore`] keeps values for the lifetime of the process.
//! - [`FileSettingsStore`] persists values as one JSON object on disk:
//!
//! ```json
//! { "enableAutoComments": false }
//! ```
//!
//! Both broadcast a change notification after every successful write.

mod file;
mod memory;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;

use feedfill_protocols::SettingsError;

/// Capacity of the change notification channel.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;

pub(crate) fn validate_key(key: &str) -> Result<(), SettingsError> {
    if key.trim().is_empty() {
        return Err(SettingsError::InvalidKey(key.to_string()));
    }
    Ok(())
}
