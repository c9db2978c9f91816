//! HTTP comment generator for FeedFill.
//!
//! POSTs the post context as JSON to `{endpoint}{path}` and reads the
//! generated comment from the `comment` field of the reply. Endpoints are
//! tried in order; the next one is only used after a transport failure.

mod api;
mod client;

pub use api::{ApiRequest, ApiResponse};
pub use client::HttpGenerator;
