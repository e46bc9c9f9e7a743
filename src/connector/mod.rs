//! # Connector Layer
//!
//! Provider integrations implementing the application port:
//! - Gemini `generateContent` over HTTP
//! - A scripted in-process client for offline runs and tests
//! - The memoizing client factory
pub mod adapter;

pub use adapter::*;
