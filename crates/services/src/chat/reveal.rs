use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Interval between revealed words.
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(50);

/// Word-by-word display progress over a reply that is already complete.
///
/// The reply itself is never shortened; only the number of visible words
/// advances.
#[derive(Debug)]
pub(crate) struct Reveal {
    words: usize,
    shown: usize,
    cancel: CancellationToken,
    pub(crate) task: Option<JoinHandle<()>>,
}

impl Reveal {
    pub(crate) fn new(reply: &str, cancel: CancellationToken) -> Self {
        Self {
            words: reply.split(' ').count(),
            shown: 0,
            cancel,
            task: None,
        }
    }

    /// Show one more word. Returns true once everything is visible.
    pub(crate) fn advance(&mut self) -> bool {
        self.shown = (self.shown + 1).min(self.words);
        self.is_done()
    }

    pub(crate) fn is_done(&self) -> bool {
        self.shown >= self.words
    }

    /// Stop the ticker. Safe to call more than once.
    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The visible prefix of `reply`.
    pub(crate) fn visible<'a>(&self, reply: &'a str) -> String {
        reply
            .split(' ')
            .take(self.shown)
            .collect::<Vec<&'a str>>()
            .join(" ")
    }
}
