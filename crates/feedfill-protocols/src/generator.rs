//! Comment generator protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::types::PostContext;

/// A single generation call: the post plus optional refinement of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub post_text: String,
    pub post_author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_draft: Option<String>,
}

impl GenerationRequest {
    pub fn new(post_text: impl Into<String>, post_author: impl Into<String>) -> Self {
        Self {
            post_text: post_text.into(),
            post_author: post_author.into(),
            refinement: None,
            current_draft: None,
        }
    }

    pub fn from_context(context: &PostContext) -> Self {
        Self::new(context.text.clone(), context.author.clone())
    }

    /// Ask for `instruction` to be applied to `draft`.
    pub fn with_refinement(
        mut self,
        instruction: impl Into<String>,
        draft: impl Into<String>,
    ) -> Self {
        self.refinement = Some(instruction.into());
        self.current_draft = Some(draft.into());
        self
    }
}

/// Produces comment text for a post.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Returns the generator ID.
    fn id(&self) -> &str;

    /// Generate a comment for the request.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError>;
}
