use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use anatomize_core::model::{ActivityState, Message, ProgressAction, Region};

use super::history::ChatHistory;
use super::reveal::{REVEAL_INTERVAL, Reveal};
use crate::error::RelayError;
use crate::notifications::{Notifier, reply_notification};
use crate::progress_store::ProgressStore;
use crate::relay_client::TutorRelay;

/// Assistant message appended when an exchange fails in the foreground.
pub const BACKEND_ERROR_MESSAGE: &str = "Error contacting backend.";

/// Everything a chat session needs from the rest of the app.
#[derive(Clone)]
pub struct ChatDeps {
    pub progress: Arc<ProgressStore>,
    pub history: ChatHistory,
    pub relay: Arc<dyn TutorRelay>,
    pub notifier: Arc<dyn Notifier>,
    pub activity: watch::Receiver<ActivityState>,
    pub reveal_interval: Duration,
}

impl ChatDeps {
    #[must_use]
    pub fn new(
        progress: Arc<ProgressStore>,
        history: ChatHistory,
        relay: Arc<dyn TutorRelay>,
        notifier: Arc<dyn Notifier>,
        activity: watch::Receiver<ActivityState>,
    ) -> Self {
        Self {
            progress,
            history,
            relay,
            notifier,
            activity,
            reveal_interval: REVEAL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Accepted,
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The text was empty after trimming.
    EmptyInput,
    /// An exchange is already in flight or its reply is still being revealed.
    Busy,
    HistoryLoading,
    Closed,
}

/// What the chat screen should render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatView {
    /// Messages with any in-progress reveal applied to the last one.
    pub messages: Vec<Message>,
    pub input: String,
    pub loading: bool,
    pub sending: bool,
    pub revealing: bool,
    /// A failed request is waiting for the app to return to the foreground.
    pub retry_pending: bool,
}

struct ChatState {
    messages: Vec<Message>,
    input: String,
    loaded: bool,
    sending: bool,
    screen_active: bool,
    pending_retry: Option<String>,
    reveal: Option<Reveal>,
    exchange: Option<JoinHandle<()>>,
}

impl ChatState {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            loaded: false,
            sending: false,
            screen_active: true,
            pending_retry: None,
            reveal: None,
            exchange: None,
        }
    }

    fn view(&self) -> ChatView {
        let mut messages = self.messages.clone();
        if let Some(reveal) = &self.reveal {
            if let Some(last) = messages.last_mut() {
                last.text = reveal.visible(&last.text);
            }
        }
        ChatView {
            messages,
            input: self.input.clone(),
            loading: !self.loaded,
            sending: self.sending,
            revealing: self.reveal.is_some(),
            retry_pending: self.pending_retry.is_some(),
        }
    }
}

struct Inner {
    region: Region,
    deps: ChatDeps,
    state: Mutex<ChatState>,
    view: watch::Sender<ChatView>,
}

/// The tutor conversation for one region.
///
/// The message list is the logical history: a reply is stored in full the
/// moment it arrives and persisted, while [`ChatView`] only shows as many of
/// its words as the reveal has reached. Every change to the message list is
/// written to the store.
///
/// Must be opened inside a Tokio runtime.
pub struct ChatSession {
    inner: Arc<Inner>,
    stop: CancellationToken,
}

impl ChatSession {
    /// Open the session and start following activity changes. History is not
    /// loaded until [`ChatSession::load_history`] is called.
    #[must_use]
    pub fn open(deps: ChatDeps, region: Region) -> Self {
        let (view, _) = watch::channel(ChatView {
            loading: true,
            ..ChatView::default()
        });
        let mut activity = deps.activity.clone();
        activity.borrow_and_update();
        let inner = Arc::new(Inner {
            region,
            deps,
            state: Mutex::new(ChatState::new()),
            view,
        });
        let stop = CancellationToken::new();
        tokio::spawn(Arc::clone(&inner).watch_activity(activity, stop.clone()));
        Self { inner, stop }
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.inner.region
    }

    /// Load the stored history, or seed the intro message. Sends are
    /// rejected until this has completed.
    pub async fn load_history(&self) {
        let messages = self.inner.deps.history.load_or_seed(self.inner.region).await;
        let mut state = self.inner.state.lock().await;
        if state.loaded {
            return;
        }
        state.messages = messages;
        state.loaded = true;
        self.inner.publish(&state);
    }

    /// Send `text` to the tutor.
    ///
    /// On acceptance the user message is appended and persisted before this
    /// returns; the exchange itself continues in the background.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Rejected(RejectReason::EmptyInput);
        }

        let mut state = self.inner.state.lock().await;
        if !state.screen_active {
            return SendOutcome::Rejected(RejectReason::Closed);
        }
        if !state.loaded {
            return SendOutcome::Rejected(RejectReason::HistoryLoading);
        }
        if state.sending {
            return SendOutcome::Rejected(RejectReason::Busy);
        }

        state.sending = true;
        state.input.clear();
        state.messages.push(Message::user(text));
        self.inner.persist(&state).await;
        self.inner.publish(&state);
        self.inner.spawn_exchange(&mut state, text.to_string());
        debug!(region = %self.inner.region, "chat message sent");
        SendOutcome::Accepted
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        let mut state = self.inner.state.lock().await;
        state.input = text.into();
        self.inner.publish(&state);
    }

    #[must_use]
    pub fn view(&self) -> ChatView {
        self.inner.view.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ChatView> {
        self.inner.view.subscribe()
    }

    /// Wait for the in-flight exchange and any reveal it started.
    ///
    /// A request parked for retry-on-resume does not count as in flight.
    /// Not cancel safe: dropping the future early stops later calls from
    /// waiting on the tasks it had picked up.
    pub async fn settle(&self) {
        loop {
            let handle = {
                let mut state = self.inner.state.lock().await;
                match state.exchange.take() {
                    Some(handle) => Some(handle),
                    None => state.reveal.as_mut().and_then(|reveal| reveal.task.take()),
                }
            };
            let Some(handle) = handle else {
                return;
            };
            if let Err(err) = handle.await {
                warn!(region = %self.inner.region, error = %err, "chat task ended abnormally");
            }
        }
    }

    /// Leave the chat screen.
    ///
    /// A reveal in progress is finished at once and announced with a
    /// notification. A request waiting for the app to resume is given up and
    /// reported as an error. An exchange still in flight keeps running and
    /// its reply is stored when it lands.
    pub async fn close(&self) {
        self.stop.cancel();
        let mut state = self.inner.state.lock().await;
        if !state.screen_active {
            return;
        }
        state.screen_active = false;
        if state.pending_retry.take().is_some() {
            state.messages.push(Message::assistant(BACKEND_ERROR_MESSAGE));
            state.sending = false;
            self.inner.persist(&state).await;
            self.inner.publish(&state);
        }
        let finished = self.inner.finish_reveal(&mut state).await;
        drop(state);
        if let Some(reply) = finished {
            self.inner.notify_reply(&reply, true, false).await;
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.stop.cancel();
        if let Ok(mut state) = self.inner.state.try_lock() {
            state.screen_active = false;
            if let Some(reveal) = &state.reveal {
                reveal.cancel();
            }
        }
    }
}

impl Inner {
    fn app_active(&self) -> bool {
        self.deps.activity.borrow().is_active()
    }

    fn publish(&self, state: &ChatState) {
        self.view.send_replace(state.view());
    }

    async fn persist(&self, state: &ChatState) {
        self.deps.history.save(self.region, &state.messages).await;
    }

    fn spawn_exchange(self: &Arc<Self>, state: &mut ChatState, text: String) {
        let inner = Arc::clone(self);
        state.exchange = Some(tokio::spawn(inner.run_exchange(text)));
    }

    async fn run_exchange(self: Arc<Self>, text: String) {
        match self.deps.relay.chat(self.region, &text).await {
            Ok(reply) => self.on_reply(reply).await,
            Err(err) => self.on_failure(text, &err).await,
        }
    }

    async fn on_reply(self: &Arc<Self>, reply: String) {
        let transition = self
            .deps
            .progress
            .dispatch(ProgressAction::IncrementChat(self.region))
            .await;
        debug!(region = %self.region, ?transition, "tutor replied");

        let mut state = self.state.lock().await;
        state.messages.push(Message::assistant(reply.clone()));
        self.persist(&state).await;

        if state.screen_active && self.app_active() {
            let cancel = CancellationToken::new();
            let mut reveal = Reveal::new(&reply, cancel.clone());
            reveal.task = Some(tokio::spawn(Arc::clone(self).run_reveal(cancel)));
            state.reveal = Some(reveal);
            self.publish(&state);
            return;
        }

        // Nobody is watching: show the whole reply and announce it.
        state.sending = false;
        self.publish(&state);
        drop(state);
        self.notify_reply(&reply, true, false).await;
    }

    async fn on_failure(&self, text: String, err: &RelayError) {
        let mut state = self.state.lock().await;
        if state.screen_active && !self.app_active() {
            info!(region = %self.region, error = %err, "chat request failed in background, will retry on resume");
            state.pending_retry = Some(text);
            self.publish(&state);
            return;
        }

        warn!(region = %self.region, error = %err, "chat request failed");
        state.messages.push(Message::assistant(BACKEND_ERROR_MESSAGE));
        state.sending = false;
        self.persist(&state).await;
        self.publish(&state);
    }

    async fn run_reveal(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.deps.reveal_interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                () = cancel.cancelled() => return,
                _ = ticker.tick() => {}
            }

            let mut state = self.state.lock().await;
            if cancel.is_cancelled() {
                return;
            }
            let Some(reveal) = state.reveal.as_mut() else {
                return;
            };
            if !reveal.advance() {
                self.publish(&state);
                continue;
            }

            let screen_active = state.screen_active;
            let finished = self.finish_reveal(&mut state).await;
            drop(state);
            if let Some(reply) = finished {
                self.notify_reply(&reply, false, screen_active).await;
            }
            return;
        }
    }

    /// Stop any reveal and show the reply in full. Returns the reply when a
    /// reveal was in progress.
    async fn finish_reveal(&self, state: &mut ChatState) -> Option<String> {
        let reveal = state.reveal.take()?;
        reveal.cancel();
        state.sending = false;
        self.persist(state).await;
        self.publish(state);
        state.messages.last().map(|message| message.text.clone())
    }

    /// Finish the reveal because the app left the foreground.
    async fn finalize_for_background(&self) {
        let mut state = self.state.lock().await;
        let screen_active = state.screen_active;
        let finished = self.finish_reveal(&mut state).await;
        drop(state);
        if let Some(reply) = finished {
            debug!(region = %self.region, "finalized reveal on background");
            self.notify_reply(&reply, false, screen_active).await;
        }
    }

    async fn resume_pending(self: &Arc<Self>) {
        let mut state = self.state.lock().await;
        let Some(text) = state.pending_retry.take() else {
            return;
        };
        info!(region = %self.region, "retrying chat request after resume");
        self.spawn_exchange(&mut state, text);
        self.publish(&state);
    }

    async fn watch_activity(
        self: Arc<Self>,
        mut activity: watch::Receiver<ActivityState>,
        stop: CancellationToken,
    ) {
        loop {
            tokio::select! {
                () = stop.cancelled() => return,
                changed = activity.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
            let current = *activity.borrow_and_update();
            if current.is_active() {
                self.resume_pending().await;
            } else {
                self.finalize_for_background().await;
            }
        }
    }

    /// Raise a reply notification unless notifications are off, or the
    /// reply is already on screen and `force` is not set.
    async fn notify_reply(&self, reply: &str, force: bool, screen_active: bool) {
        if !self.deps.progress.notifications_granted().await {
            debug!(region = %self.region, "notifications not granted, skipping");
            return;
        }
        if !force && screen_active && self.app_active() {
            return;
        }
        let notification = reply_notification(self.region, reply);
        if let Err(err) = self.deps.notifier.notify(notification).await {
            warn!(region = %self.region, error = %err, "failed to raise notification");
        }
    }
}
