mod analyze_room;
mod conversation_session;

pub use analyze_room::*;
pub use conversation_session::*;
