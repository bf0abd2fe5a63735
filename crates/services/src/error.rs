//! Shared error types for the services crate.

use thiserror::Error;

use anatomize_core::model::{QuizQuestionError, Region};
use storage::sqlite::SqliteInitError;

/// Errors emitted by the tutoring relay client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("relay returned an empty reply")]
    EmptyReply,
    #[error("relay request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("relay reported unhealthy status: {0}")]
    Unhealthy(String),
    #[error(transparent)]
    InvalidQuestion(#[from] QuizQuestionError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by a `Notifier`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotifyError {
    #[error("notifications are not permitted")]
    NotPermitted,
    #[error("notification backend failed: {0}")]
    Backend(String),
}

/// Errors emitted when a quiz cannot be started.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("no local questions available for {0}")]
    NoLocalQuestions(Region),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Relay(#[from] reqwest::Error),
}
