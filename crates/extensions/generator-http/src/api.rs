//! Generator wire types.

use serde::{Deserialize, Serialize};

use feedfill_protocols::GenerationRequest;

/// Request body. Absent refinement fields are sent as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub post_text: String,
    pub post_author: String,
    pub refinement: String,
    pub current_comment: String,
}

impl From<&GenerationRequest> for ApiRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            post_text: request.post_text.clone(),
            post_author: request.post_author.clone(),
            refinement: request.refinement.clone().unwrap_or_default(),
            current_comment: request.current_draft.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub comment: Option<String>,
}
