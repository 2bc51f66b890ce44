use quiz_core::time::fixed_now;
use storage::player_state::PlayerStateStore;
use storage::repository::{KeyValueRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrips_raw_keys() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.set("k", "v1").await.unwrap();
    repo.set("k", "v2").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v2"));
}

#[tokio::test]
async fn sqlite_migration_is_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.set("k", "v").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn sqlite_persists_player_state() {
    let storage = Storage::sqlite("sqlite:file:memdb_player?mode=memory&cache=shared")
        .await
        .expect("init storage");
    let store = PlayerStateStore::from_storage(&storage);

    assert!(store.earned_badges("alice").await.unwrap().is_empty());

    let badges = vec!["Kernel".to_string(), "Memory".to_string()];
    store.set_earned_badges("alice", &badges).await.unwrap();
    assert_eq!(store.earned_badges("alice").await.unwrap(), badges);
    assert!(store.earned_badges("bob").await.unwrap().is_empty());

    let at = fixed_now();
    store.set_last_challenge_at("alice", at).await.unwrap();
    assert_eq!(store.last_challenge_at("alice").await.unwrap(), Some(at));

    store
        .set_profile_image_path("alice", "/home/alice/avatar.png")
        .await
        .unwrap();
    assert_eq!(
        store.profile_image_path("alice").await.unwrap().as_deref(),
        Some("/home/alice/avatar.png")
    );
}
