//! HTTP route handlers.

mod health;
mod sessions;
mod turns;

pub use health::health_handler;
pub use sessions::{delete_session_handler, get_session_handler, list_sessions_handler};
pub use turns::{match_handler, root_handler, turn_handler};
