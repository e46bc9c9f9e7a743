mod chat_turn;
mod generation;
mod image_payload;
mod product;
mod provider_config;
mod recommendation;

pub use chat_turn::*;
pub use generation::*;
pub use image_payload::*;
pub use product::*;
pub use provider_config::*;
pub use recommendation::*;
