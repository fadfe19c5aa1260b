//! Language-model client for signaldesk.
//!
//! Wraps `reqwest` around an OpenAI-compatible chat-completions endpoint,
//! requesting a single structured JSON-object response per call. Treated by
//! the rest of the system as an opaque, possibly slow, possibly failing
//! remote dependency — every call carries a timeout.

mod client;
mod error;

pub use client::ChatClient;
pub use error::AiError;
