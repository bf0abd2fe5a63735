use tokio::sync::watch;

use anatomize_core::model::ActivityState;

/// Publishes the process foreground/background state to the engines.
///
/// The host calls [`ActivityMonitor::set`] whenever its lifecycle changes;
/// engines hold receivers from [`ActivityMonitor::subscribe`].
#[derive(Debug, Clone)]
pub struct ActivityMonitor {
    tx: watch::Sender<ActivityState>,
}

impl ActivityMonitor {
    #[must_use]
    pub fn new(initial: ActivityState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Record a lifecycle change. Repeating the current state wakes nobody.
    pub fn set(&self, state: ActivityState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }

    #[must_use]
    pub fn current(&self) -> ActivityState {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ActivityState> {
        self.tx.subscribe()
    }
}

impl Default for ActivityMonitor {
    fn default() -> Self {
        Self::new(ActivityState::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_changes_but_not_repeats() {
        let monitor = ActivityMonitor::default();
        let mut rx = monitor.subscribe();

        monitor.set(ActivityState::Active);
        assert!(!rx.has_changed().unwrap());

        monitor.set(ActivityState::Background);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ActivityState::Background);
        assert_eq!(monitor.current(), ActivityState::Background);
    }
}
