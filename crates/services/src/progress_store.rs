use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use anatomize_core::model::{
    AppState, AppStateSnapshot, ProgressAction, Region, RegionProgress, Transition,
};
use storage::keys::APP_STATE_KEY;
use storage::repository::{KeyValueStore, get_json, set_json};

/// The shared application state, with every accepted change written through
/// to the key-value store.
///
/// All mutation goes through [`ProgressStore::dispatch`]. Writes happen while
/// the state lock is held, so they reach the store in dispatch order.
pub struct ProgressStore {
    state: Mutex<AppState>,
    kv: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: Mutex::new(AppState::new()),
            kv,
        }
    }

    /// Load the persisted state and merge it over the defaults.
    ///
    /// A missing, unreadable or malformed snapshot leaves the defaults in
    /// place. Hydration itself never writes.
    pub async fn hydrate(&self) -> Transition {
        let snapshot = match get_json::<AppStateSnapshot>(self.kv.as_ref(), APP_STATE_KEY).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("no persisted progress, starting fresh");
                return Transition::Unchanged;
            }
            Err(err) => {
                warn!(error = %err, "failed to load persisted progress");
                return Transition::Unchanged;
            }
        };
        let mut state = self.state.lock().await;
        state.apply(ProgressAction::Hydrate(snapshot))
    }

    /// Apply an action and persist the result if anything changed.
    ///
    /// Persistence failures are logged; the in-memory state stays
    /// authoritative for the rest of the session.
    pub async fn dispatch(&self, action: ProgressAction) -> Transition {
        let mut state = self.state.lock().await;
        let transition = state.apply(action);
        if transition.is_changed() {
            self.persist(&state).await;
        }
        transition
    }

    /// Copy of the current state.
    pub async fn state(&self) -> AppState {
        self.state.lock().await.clone()
    }

    pub async fn progress(&self, region: Region) -> RegionProgress {
        self.state.lock().await.progress(region).clone()
    }

    pub async fn notifications_granted(&self) -> bool {
        self.state.lock().await.notifications_granted()
    }

    /// Write the current state unconditionally, e.g. at shutdown.
    pub async fn flush(&self) {
        let state = self.state.lock().await;
        self.persist(&state).await;
    }

    async fn persist(&self, state: &AppState) {
        if let Err(err) = set_json(self.kv.as_ref(), APP_STATE_KEY, state).await {
            warn!(error = %err, "failed to persist progress");
        }
    }
}
