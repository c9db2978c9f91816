//! Error types for the FeedFill protocol layer.

mod generator;
mod settings;

pub use generator::*;
pub use settings::*;
