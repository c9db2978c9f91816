//! Shared value types.

use serde::{Deserialize, Serialize};

/// Text body and author label extracted from a post container.
///
/// Both fields are trimmed and empty when they could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContext {
    pub text: String,
    pub author: String,
}

impl PostContext {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// Both text and author were found.
    pub fn is_complete(&self) -> bool {
        !self.text.is_empty() && !self.author.is_empty()
    }
}
