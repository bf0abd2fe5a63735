use anatomize_core::model::{AppState, AppStateSnapshot, Message, ProgressAction, Region};
use storage::keys::{APP_STATE_KEY, chat_history_key};
use storage::repository::{KeyValueStore, Storage, get_json, set_json};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_set_overwrites_and_remove_deletes() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_basic?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.set("greeting", "hello").await.unwrap();
    repo.set("greeting", "hello again").await.unwrap();
    assert_eq!(
        repo.get("greeting").await.unwrap().as_deref(),
        Some("hello again")
    );

    repo.remove("greeting").await.unwrap();
    repo.remove("greeting").await.unwrap();
    assert_eq!(repo.get("greeting").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn app_state_and_history_survive_a_new_connection() {
    let url = "sqlite:file:memdb_kv_reopen?mode=memory&cache=shared";
    let first = Storage::sqlite(url).await.expect("open");

    let mut state = AppState::new();
    state.apply(ProgressAction::MarkSummaryRead(Region::Pelvis));
    state.apply(ProgressAction::IncrementQuizCorrect {
        region: Region::Pelvis,
        question_id: "Which bone forms the pelvic inlet?".into(),
    });
    set_json(first.kv.as_ref(), APP_STATE_KEY, &state)
        .await
        .unwrap();

    let history = vec![Message::assistant("intro"), Message::user("What is the ilium?")];
    set_json(first.kv.as_ref(), &chat_history_key(Region::Pelvis), &history)
        .await
        .unwrap();

    // The first pool keeps the shared in-memory database alive.
    let second = Storage::sqlite(url).await.expect("reopen");
    let snapshot: AppStateSnapshot = get_json(second.kv.as_ref(), APP_STATE_KEY)
        .await
        .unwrap()
        .expect("state persisted");
    let mut restored = AppState::new();
    restored.apply(ProgressAction::Hydrate(snapshot));
    assert_eq!(restored, state);

    let loaded: Vec<Message> = get_json(second.kv.as_ref(), &chat_history_key(Region::Pelvis))
        .await
        .unwrap()
        .expect("history persisted");
    assert_eq!(loaded, history);
    drop(first);
}
