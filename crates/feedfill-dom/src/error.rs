//! DOM errors.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Node {0} is not a child of this node")]
    NotAChild(NodeId),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomError {
    pub(crate) fn selector(selector: &str, reason: impl Into<String>) -> Self {
        DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}
