//! REST client for the Gemini `generateContent` endpoint.
//!
//! Provides typed request/response payloads, credential configuration
//! loaded once at startup, and a thin HTTP wrapper used to turn a captured
//! image plus an instruction into generated text.

pub mod api;
pub mod config;
pub mod messages;

pub use api::{GeminiApi, GeminiApiError};
pub use config::GeminiConfig;
pub use messages::InlineData;
