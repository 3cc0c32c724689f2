pub mod commands;
mod history;
mod models;
mod session;

pub use history::ChatHistoryStore;
pub use models::{derive_title, ChatHistoryEntry, Message, Role, TITLE_MAX_CHARS};
pub use session::ChatSession;
