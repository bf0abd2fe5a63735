#![forbid(unsafe_code)]

pub mod activity;
pub mod app_services;
pub mod chat;
pub mod error;
pub mod notifications;
pub mod progress_store;
pub mod quiz_session;
pub mod relay_client;

pub use activity::ActivityMonitor;
pub use app_services::AppServices;
pub use chat::{ChatDeps, ChatHistory, ChatSession, ChatView, RejectReason, SendOutcome};
pub use error::{AppServicesError, NotifyError, QuizSessionError, RelayError};
pub use notifications::{Notification, Notifier, TracingNotifier, reply_notification};
pub use progress_store::ProgressStore;
pub use quiz_session::{AnswerOutcome, QUIZ_FETCH_TIMEOUT, QuizDeps, QuizSession, quiz_fetch_timeout};
pub use relay_client::{HttpRelayClient, RelayConfig, TutorRelay};
