//! Static learning content bundled with the app.

mod quiz_bank;
mod summaries;

pub use quiz_bank::{BankQuestion, bank_questions};
pub use summaries::summary;

use crate::model::Region;

/// Seed message shown when a region has no chat history yet.
#[must_use]
pub fn chat_intro(region: Region) -> String {
    format!("You're now chatting about the {region} region. Ask a question.")
}
