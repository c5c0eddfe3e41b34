//! Backend-mediated full-text search
//!
//! Turns structured queries into backend requests (routing, sizing, scroll,
//! highlighting), executes them as lazy hit streams and shapes highlighted
//! results into transport-safe snippets.

pub mod backend;
pub mod highlighter;
pub mod request;
pub mod searcher;
pub mod types;

pub use highlighter::Highlighter;
pub use request::{SearchRequestBuilder, ROUTING_KEY_LIMIT};
pub use searcher::Searcher;
pub use types::*;
