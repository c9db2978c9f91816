//! Generator errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Generator returned no content")]
    EmptyContent,

    #[error("All {attempts} endpoints failed, last error: {last_error}")]
    AllEndpointsFailed { attempts: usize, last_error: String },

    #[error("No generator endpoints configured")]
    NoEndpoints,

    #[error("Invalid generator configuration: {0}")]
    Configuration(String),
}

impl GeneratorError {
    /// Whether the next endpoint should be tried after this error.
    pub fn is_transport(&self) -> bool {
        matches!(self, GeneratorError::Transport(_))
    }
}
