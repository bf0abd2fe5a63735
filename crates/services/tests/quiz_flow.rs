mod support;

use std::sync::Arc;
use std::time::Duration;

use anatomize_core::content::bank_questions;
use anatomize_core::model::Region;
use services::{
    AnswerOutcome, ProgressStore, QUIZ_FETCH_TIMEOUT, QuizDeps, QuizSession, quiz_fetch_timeout,
};
use storage::repository::InMemoryStore;

use support::{FakeRelay, question};

fn quiz_deps(relay: FakeRelay) -> (QuizDeps, Arc<ProgressStore>, Arc<FakeRelay>) {
    let progress = Arc::new(ProgressStore::new(Arc::new(InMemoryStore::new())));
    let relay = Arc::new(relay);
    let deps = QuizDeps::new(progress.clone(), relay.clone(), Duration::from_secs(5)).with_seed(7);
    (deps, progress, relay)
}

fn is_local(region: Region, text: &str) -> bool {
    bank_questions(region).iter().any(|entry| entry.text == text)
}

#[tokio::test(start_paused = true)]
async fn next_question_swaps_in_the_prefetched_one() {
    let relay = FakeRelay::new()
        .with_question(question("Q1", ["A", "B", "C", "D"], "B"))
        .with_question(question("Q2", ["A", "B", "C", "D"], "C"))
        .with_question(question("Q3", ["A", "B", "C", "D"], "D"))
        .with_quiz_delay(Duration::from_millis(200));
    let (deps, _progress, relay) = quiz_deps(relay);

    let quiz = QuizSession::start(deps, Region::Thorax).await.unwrap();
    assert_eq!(quiz.current().text(), "Q1");

    // The prefetch has not resolved yet, so there is nothing to swap to.
    assert!(!quiz.has_next());
    assert!(!quiz.next_question());
    assert_eq!(quiz.current().text(), "Q1");

    quiz.prefetch_ready().await;
    assert!(quiz.has_next());
    assert!(quiz.next_question());
    assert_eq!(quiz.current().text(), "Q2");
    assert_eq!(quiz.selected(), None);

    quiz.prefetch_ready().await;
    assert!(quiz.next_question());
    assert_eq!(quiz.current().text(), "Q3");
    assert_eq!(relay.quiz_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn only_the_first_choice_counts() {
    let relay = FakeRelay::new().with_question(question("Q1", ["A", "B", "C", "D"], "B"));
    let (deps, progress, _relay) = quiz_deps(relay);
    let quiz = QuizSession::start(deps, Region::Back).await.unwrap();

    assert_eq!(quiz.select_answer("Z").await, AnswerOutcome::Ignored);
    let outcome = quiz.select_answer("A").await;
    assert_eq!(
        outcome,
        AnswerOutcome::Answered {
            correct: false,
            feedback: "Incorrect. B is right.".into(),
            celebrate: false,
        }
    );
    assert_eq!(quiz.select_answer("B").await, AnswerOutcome::Ignored);
    assert_eq!(quiz.selected().as_deref(), Some("A"));
    assert_eq!(progress.progress(Region::Back).await.quiz_correct_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn repeated_question_text_is_credited_once() {
    let q1 = question("Q1", ["A", "B", "C", "D"], "B");
    let relay = FakeRelay::new()
        .with_question(q1.clone())
        .with_question(q1.clone());
    let (deps, progress, _relay) = quiz_deps(relay);
    let quiz = QuizSession::start(deps, Region::Abdomen).await.unwrap();

    let first = quiz.select_answer("B").await;
    assert!(matches!(first, AnswerOutcome::Answered { correct: true, .. }));

    quiz.prefetch_ready().await;
    assert!(quiz.next_question());
    assert_eq!(quiz.current(), q1);
    let second = quiz.select_answer("B").await;
    assert!(matches!(second, AnswerOutcome::Answered { correct: true, .. }));

    assert_eq!(
        progress.progress(Region::Abdomen).await.quiz_correct_count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn third_distinct_correct_answer_celebrates_once() {
    let relay = FakeRelay::new()
        .with_question(question("N1", ["A", "B", "C", "D"], "A"))
        .with_question(question("N2", ["A", "B", "C", "D"], "A"))
        .with_question(question("N3", ["A", "B", "C", "D"], "A"))
        .with_question(question("N4", ["A", "B", "C", "D"], "A"));
    let (deps, progress, _relay) = quiz_deps(relay);
    let quiz = QuizSession::start(deps, Region::Neck).await.unwrap();

    let mut celebrations = Vec::new();
    for round in 0..4 {
        if round > 0 {
            quiz.prefetch_ready().await;
            assert!(quiz.next_question());
        }
        match quiz.select_answer("A").await {
            AnswerOutcome::Answered {
                correct, celebrate, ..
            } => {
                assert!(correct);
                celebrations.push(celebrate);
            }
            AnswerOutcome::Ignored => panic!("answer ignored in round {round}"),
        }
    }

    assert_eq!(celebrations, vec![false, false, true, false]);
    let neck = progress.progress(Region::Neck).await;
    assert!(neck.quiz_complete());
    assert_eq!(neck.quiz_correct_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn relay_failure_falls_back_to_local_bank() {
    let (deps, _progress, relay) = quiz_deps(FakeRelay::new());
    let quiz = QuizSession::start(deps, Region::UpperLimb).await.unwrap();

    assert!(is_local(Region::UpperLimb, quiz.current().text()));
    quiz.prefetch_ready().await;
    assert!(quiz.next_question());
    assert!(is_local(Region::UpperLimb, quiz.current().text()));
    assert!(relay.quiz_calls() >= 2);
}

#[tokio::test(start_paused = true)]
async fn slow_relay_falls_back_after_timeout() {
    let relay = FakeRelay::new()
        .with_question(question("Too late", ["A", "B", "C", "D"], "A"))
        .with_quiz_delay(Duration::from_secs(60));
    let (deps, _progress, _relay) = quiz_deps(relay);
    let quiz = QuizSession::start(deps, Region::Head).await.unwrap();

    assert_ne!(quiz.current().text(), "Too late");
    assert!(is_local(Region::Head, quiz.current().text()));
}

#[tokio::test(start_paused = true)]
async fn default_relay_timeout_does_not_stall_quiz_entry() {
    let relay_timeout = Duration::from_secs(30);
    let fetch_timeout = quiz_fetch_timeout(relay_timeout);
    assert_eq!(fetch_timeout, QUIZ_FETCH_TIMEOUT);
    assert_eq!(quiz_fetch_timeout(Duration::from_secs(2)), Duration::from_secs(2));

    let relay = Arc::new(
        FakeRelay::new()
            .with_question(question("Slow", ["A", "B", "C", "D"], "A"))
            .with_quiz_delay(Duration::from_secs(20)),
    );
    let progress = Arc::new(ProgressStore::new(Arc::new(InMemoryStore::new())));
    let deps = QuizDeps::new(progress, relay, fetch_timeout).with_seed(3);

    let started = tokio::time::Instant::now();
    let quiz = QuizSession::start(deps, Region::Perineum).await.unwrap();
    assert!(started.elapsed() < relay_timeout);
    assert!(is_local(Region::Perineum, quiz.current().text()));
}
