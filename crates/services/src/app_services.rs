use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use anatomize_core::model::{ProgressAction, Region, RelaySettings};
use storage::repository::Storage;

use crate::activity::ActivityMonitor;
use crate::chat::{ChatDeps, ChatHistory, ChatSession};
use crate::error::{AppServicesError, QuizSessionError};
use crate::notifications::{Notifier, TracingNotifier};
use crate::progress_store::ProgressStore;
use crate::quiz_session::{QuizDeps, QuizSession, quiz_fetch_timeout};
use crate::relay_client::{HttpRelayClient, TutorRelay};

/// Assembles the shared progress store and hands out region sessions.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressStore>,
    history: ChatHistory,
    relay: Arc<dyn TutorRelay>,
    notifier: Arc<dyn Notifier>,
    activity: ActivityMonitor,
    fetch_timeout: Duration,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP relay.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// HTTP client cannot be built.
    pub async fn new_sqlite(db_url: &str, relay: RelaySettings) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let fetch_timeout = quiz_fetch_timeout(Duration::from_secs(relay.timeout_secs()));
        let client = HttpRelayClient::new(relay)?;
        Ok(Self::bootstrap(
            storage,
            Arc::new(client),
            Arc::new(TracingNotifier),
            fetch_timeout,
        )
        .await)
    }

    /// Hydrate progress from `storage` and record whether notifications are
    /// permitted.
    pub async fn bootstrap(
        storage: Storage,
        relay: Arc<dyn TutorRelay>,
        notifier: Arc<dyn Notifier>,
        fetch_timeout: Duration,
    ) -> Self {
        let progress = Arc::new(ProgressStore::new(Arc::clone(&storage.kv)));
        progress.hydrate().await;

        let granted = notifier.permission_granted().await;
        progress
            .dispatch(ProgressAction::SetNotificationsGranted(granted))
            .await;
        info!(notifications_granted = granted, "services ready");

        Self {
            progress,
            history: ChatHistory::new(storage.kv),
            relay,
            notifier,
            activity: ActivityMonitor::default(),
            fetch_timeout,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn chat_history(&self) -> ChatHistory {
        self.history.clone()
    }

    #[must_use]
    pub fn relay(&self) -> Arc<dyn TutorRelay> {
        Arc::clone(&self.relay)
    }

    #[must_use]
    pub fn activity(&self) -> &ActivityMonitor {
        &self.activity
    }

    /// Open the chat for `region`. Call `load_history` before sending.
    #[must_use]
    pub fn chat_session(&self, region: Region) -> ChatSession {
        let deps = ChatDeps::new(
            Arc::clone(&self.progress),
            self.history.clone(),
            Arc::clone(&self.relay),
            Arc::clone(&self.notifier),
            self.activity.subscribe(),
        );
        ChatSession::open(deps, region)
    }

    /// Start a quiz for `region`.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError` if the region has no fallback questions.
    pub async fn quiz_session(&self, region: Region) -> Result<QuizSession, QuizSessionError> {
        let deps = QuizDeps::new(
            Arc::clone(&self.progress),
            Arc::clone(&self.relay),
            self.fetch_timeout,
        );
        QuizSession::start(deps, region).await
    }

    /// Write the final state before exit.
    pub async fn shutdown(&self) {
        self.progress.flush().await;
    }
}
