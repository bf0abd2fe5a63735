//! Per-region tutor chat.

mod history;
mod reveal;
mod session;

pub use history::ChatHistory;
pub use reveal::REVEAL_INTERVAL;
pub use session::{BACKEND_ERROR_MESSAGE, ChatDeps, ChatSession, ChatView, RejectReason, SendOutcome};
