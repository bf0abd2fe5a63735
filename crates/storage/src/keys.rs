//! Storage key layout.

use anatomize_core::model::Region;

/// Key holding the serialized `AppState`.
pub const APP_STATE_KEY: &str = "ANATOMIZE_APP_STATE_V1";

/// Prefix for per-region chat history keys.
pub const CHAT_HISTORY_PREFIX: &str = "CHAT_HISTORY_";

/// Key holding the chat history for one region.
#[must_use]
pub fn chat_history_key(region: Region) -> String {
    format!("{CHAT_HISTORY_PREFIX}{}", region.key())
}
