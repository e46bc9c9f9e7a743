mod client_factory;
mod gemini_client;
mod mock_client;

pub use client_factory::*;
pub use gemini_client::*;
pub use mock_client::*;
