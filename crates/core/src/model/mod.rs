mod activity;
mod message;
mod progress;
mod quiz;
mod region;
mod relay_settings;

pub use activity::ActivityState;
pub use message::{Message, MessageRole};
pub use progress::{
    Activity, AppState, AppStateSnapshot, CHAT_TARGET, ProgressAction, QUIZ_TARGET,
    RegionProgress, RegionProgressSnapshot, Transition,
};
pub use quiz::{QuizQuestion, QuizQuestionDraft, QuizQuestionError, QUIZ_OPTION_COUNT};
pub use region::{Region, RegionParseError};
pub use relay_settings::{
    DEFAULT_RELAY_URL, DEFAULT_TIMEOUT_SECS, RelaySettings, RelaySettingsDraft, RelaySettingsError,
};
