use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use anatomize_core::content::bank_questions;
use anatomize_core::model::{Activity, ProgressAction, QuizQuestion, Region};

use crate::error::QuizSessionError;
use crate::progress_store::ProgressStore;
use crate::relay_client::TutorRelay;

/// Upper bound on waiting for a remote question. Kept below the relay
/// request timeout so a slow relay falls back to the local bank quickly.
pub const QUIZ_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Quiz fetch timeout for a relay whose requests time out after
/// `relay_timeout`.
#[must_use]
pub fn quiz_fetch_timeout(relay_timeout: Duration) -> Duration {
    relay_timeout.min(QUIZ_FETCH_TIMEOUT)
}

/// Everything a quiz session needs from the rest of the app.
#[derive(Clone)]
pub struct QuizDeps {
    pub progress: Arc<ProgressStore>,
    pub relay: Arc<dyn TutorRelay>,
    /// Longest wait for a remote question before using a local one.
    pub fetch_timeout: Duration,
    /// Seed for local question picks; random when unset.
    pub seed: Option<u64>,
}

impl QuizDeps {
    #[must_use]
    pub fn new(progress: Arc<ProgressStore>, relay: Arc<dyn TutorRelay>, fetch_timeout: Duration) -> Self {
        Self {
            progress,
            relay,
            fetch_timeout,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of picking an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// An answer was already chosen, or the option is not offered.
    Ignored,
    Answered {
        correct: bool,
        /// `"Correct. "` or `"Incorrect. "` followed by the explanation.
        feedback: String,
        /// True only for the answer that completed the region's quiz.
        celebrate: bool,
    },
}

struct QuestionSource {
    region: Region,
    relay: Arc<dyn TutorRelay>,
    fetch_timeout: Duration,
    local: Vec<QuizQuestion>,
    rng: Mutex<StdRng>,
}

impl QuestionSource {
    /// A remote question, or a random local one if the relay fails or is
    /// too slow.
    async fn fetch(&self) -> QuizQuestion {
        match tokio::time::timeout(self.fetch_timeout, self.relay.quiz(self.region)).await {
            Ok(Ok(question)) => question,
            Ok(Err(err)) => {
                debug!(region = %self.region, error = %err, "remote question unavailable, using local bank");
                self.local_question()
            }
            Err(_) => {
                debug!(region = %self.region, "remote question timed out, using local bank");
                self.local_question()
            }
        }
    }

    fn local_question(&self) -> QuizQuestion {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let index = rng.random_range(0..self.local.len());
        self.local[index].clone()
    }
}

struct QuizState {
    current: QuizQuestion,
    selected: Option<String>,
}

/// One region's quiz with a single prefetched question.
///
/// While the current question is on screen the next one is fetched in the
/// background; [`QuizSession::next_question`] only swaps once it has
/// arrived.
pub struct QuizSession {
    region: Region,
    progress: Arc<ProgressStore>,
    source: Arc<QuestionSource>,
    state: Mutex<QuizState>,
    next: Arc<watch::Sender<Option<QuizQuestion>>>,
    prefetch: Mutex<Option<JoinHandle<()>>>,
}

impl QuizSession {
    /// Fetch the first question and start prefetching the second.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NoLocalQuestions` if the region has no
    /// usable fallback questions.
    pub async fn start(deps: QuizDeps, region: Region) -> Result<Self, QuizSessionError> {
        let local: Vec<QuizQuestion> = bank_questions(region)
            .iter()
            .filter_map(|entry| entry.to_question().ok())
            .collect();
        if local.is_empty() {
            return Err(QuizSessionError::NoLocalQuestions(region));
        }
        let rng = match deps.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let source = Arc::new(QuestionSource {
            region,
            relay: deps.relay,
            fetch_timeout: deps.fetch_timeout,
            local,
            rng: Mutex::new(rng),
        });

        let current = source.fetch().await;
        let (next, _) = watch::channel(None);
        let next = Arc::new(next);
        let session = Self {
            region,
            progress: deps.progress,
            source,
            state: Mutex::new(QuizState {
                current,
                selected: None,
            }),
            next,
            prefetch: Mutex::new(None),
        };
        session.refill();
        Ok(session)
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    #[must_use]
    pub fn current(&self) -> QuizQuestion {
        self.lock_state().current.clone()
    }

    /// The option chosen for the current question, if any.
    #[must_use]
    pub fn selected(&self) -> Option<String> {
        self.lock_state().selected.clone()
    }

    /// Whether the prefetched question has arrived.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next.borrow().is_some()
    }

    /// Wait until the prefetched question has arrived.
    pub async fn prefetch_ready(&self) {
        let mut rx = self.next.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(Option::is_some).await;
    }

    /// Move to the prefetched question and start fetching the one after.
    ///
    /// Returns false, changing nothing, while the prefetch is still pending.
    pub fn next_question(&self) -> bool {
        let Some(question) = self.next.send_replace(None) else {
            return false;
        };
        {
            let mut state = self.lock_state();
            state.current = question;
            state.selected = None;
        }
        self.refill();
        true
    }

    /// Choose `option` for the current question.
    ///
    /// Only the first choice per question counts. A correct answer credits
    /// the region, keyed by the question text.
    pub async fn select_answer(&self, option: &str) -> AnswerOutcome {
        let question = {
            let mut state = self.lock_state();
            if state.selected.is_some() || !state.current.has_option(option) {
                return AnswerOutcome::Ignored;
            }
            state.selected = Some(option.to_string());
            state.current.clone()
        };

        let correct = question.is_correct(option);
        let mut celebrate = false;
        if correct {
            let transition = self
                .progress
                .dispatch(ProgressAction::IncrementQuizCorrect {
                    region: self.region,
                    question_id: question.text().to_string(),
                })
                .await;
            celebrate = transition.completed(Activity::Quiz);
        }

        let verdict = if correct { "Correct." } else { "Incorrect." };
        AnswerOutcome::Answered {
            correct,
            feedback: format!("{verdict} {}", question.explanation()).trim_end().to_string(),
            celebrate,
        }
    }

    fn refill(&self) {
        let source = Arc::clone(&self.source);
        let next = Arc::clone(&self.next);
        let handle = tokio::spawn(async move {
            let question = source.fetch().await;
            next.send_replace(Some(question));
        });
        let mut prefetch = self.prefetch.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = prefetch.replace(handle) {
            previous.abort();
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, QuizState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        let prefetch = self.prefetch.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = prefetch.take() {
            handle.abort();
        }
    }
}
