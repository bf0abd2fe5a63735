#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use anatomize_core::model::{QuizQuestion, QuizQuestionDraft, Region};
use services::{AppServices, Notification, Notifier, NotifyError, RelayError, TutorRelay};
use storage::repository::{InMemoryStore, KeyValueStore, Storage, StorageError};

//
// ─── RELAY ─────────────────────────────────────────────────────────────────────
//

/// Relay double answering from scripted queues. An exhausted queue fails.
#[derive(Default)]
pub struct FakeRelay {
    chat_replies: Mutex<VecDeque<Option<String>>>,
    questions: Mutex<VecDeque<QuizQuestion>>,
    chat_delay: Duration,
    quiz_delay: Duration,
    chat_calls: AtomicUsize,
    quiz_calls: AtomicUsize,
    chat_inputs: Mutex<Vec<(Region, String)>>,
}

impl FakeRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chat reply; `None` makes that call fail.
    pub fn with_chat(self, reply: Option<&str>) -> Self {
        self.chat_replies
            .lock()
            .unwrap()
            .push_back(reply.map(ToString::to_string));
        self
    }

    pub fn with_question(self, question: QuizQuestion) -> Self {
        self.questions.lock().unwrap().push_back(question);
        self
    }

    pub fn with_chat_delay(mut self, delay: Duration) -> Self {
        self.chat_delay = delay;
        self
    }

    pub fn with_quiz_delay(mut self, delay: Duration) -> Self {
        self.quiz_delay = delay;
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn quiz_calls(&self) -> usize {
        self.quiz_calls.load(Ordering::SeqCst)
    }

    pub fn chat_inputs(&self) -> Vec<(Region, String)> {
        self.chat_inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl TutorRelay for FakeRelay {
    async fn chat(&self, region: Region, input_text: &str) -> Result<String, RelayError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.chat_inputs
            .lock()
            .unwrap()
            .push((region, input_text.to_string()));
        if !self.chat_delay.is_zero() {
            tokio::time::sleep(self.chat_delay).await;
        }
        let next = self.chat_replies.lock().unwrap().pop_front();
        next.flatten().ok_or(RelayError::EmptyReply)
    }

    async fn quiz(&self, _region: Region) -> Result<QuizQuestion, RelayError> {
        self.quiz_calls.fetch_add(1, Ordering::SeqCst);
        if !self.quiz_delay.is_zero() {
            tokio::time::sleep(self.quiz_delay).await;
        }
        let next = self.questions.lock().unwrap().pop_front();
        next.ok_or(RelayError::EmptyReply)
    }

    async fn health(&self) -> Result<(), RelayError> {
        Ok(())
    }
}

pub fn question(text: &str, options: [&str; 4], answer: &str) -> QuizQuestion {
    QuizQuestionDraft {
        text: text.into(),
        options: options.iter().map(ToString::to_string).collect(),
        answer: answer.into(),
        explanation: format!("{answer} is right."),
    }
    .validate()
    .unwrap()
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// In-memory store that records every key written.
#[derive(Clone, Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    writes: Arc<Mutex<Vec<String>>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes_to(&self, key: &str) -> usize {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|written| written.as_str() == key)
            .count()
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.lock().unwrap().push(key.to_string());
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("disk unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk unavailable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk unavailable".into()))
    }
}

//
// ─── NOTIFIER ──────────────────────────────────────────────────────────────────
//

pub struct RecordingNotifier {
    granted: bool,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new(granted: bool) -> Self {
        Self {
            granted,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn permission_granted(&self) -> bool {
        self.granted
    }

    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

//
// ─── HARNESS ───────────────────────────────────────────────────────────────────
//

pub struct Harness {
    pub services: AppServices,
    pub store: CountingStore,
    pub relay: Arc<FakeRelay>,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn harness(relay: FakeRelay) -> Harness {
    harness_with(CountingStore::new(), relay, true).await
}

pub async fn harness_with(store: CountingStore, relay: FakeRelay, granted: bool) -> Harness {
    let relay = Arc::new(relay);
    let notifier = Arc::new(RecordingNotifier::new(granted));
    let storage = Storage {
        kv: Arc::new(store.clone()),
    };
    let services = AppServices::bootstrap(
        storage,
        relay.clone(),
        notifier.clone(),
        Duration::from_secs(5),
    )
    .await;
    Harness {
        services,
        store,
        relay,
        notifier,
    }
}
