use rollcall_database::{Database, DatabaseError};
use std::time::Duration;

fn memory_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .build()
        .expect("valid parameters")
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().build().unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));

    let err = Database::builder().url("mem://").build().unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn build_is_lazy_and_connect_is_idempotent() {
    let db = memory_db();
    assert!(!db.is_connected().await);

    let first = db.connect().await.expect("connect to mem://");
    first.query("CREATE marker:one SET value = 1").await.expect("create marker");

    // A second connect must hand back the same engine, so the row is visible.
    let second = db.connect().await.expect("reuse connection");
    let mut response =
        second.query("SELECT VALUE value FROM marker").await.expect("select marker");
    let values: Vec<i64> = response.take(0).expect("decode values");
    assert_eq!(values, vec![1]);
}

#[tokio::test]
async fn concurrent_first_connects_share_one_client() {
    let db = memory_db();

    let (a, b) = tokio::join!(db.connect(), db.connect());
    let a = a.expect("first");
    let b = b.expect("second");

    a.query("CREATE marker:shared SET value = 2").await.expect("create");
    let mut response = b.query("SELECT VALUE value FROM marker").await.expect("select");
    let values: Vec<i64> = response.take(0).expect("decode values");
    assert_eq!(values, vec![2]);
}

#[tokio::test]
async fn close_is_idempotent_and_reconnect_starts_fresh() {
    let db = memory_db();
    db.connect().await.expect("connect").query("CREATE marker:gone SET value = 3").await.expect("create");

    db.close().await;
    db.close().await;
    assert!(!db.is_connected().await);

    let fresh = db.connect().await.expect("reconnect");
    let mut response = fresh.query("SELECT VALUE value FROM marker").await.expect("select");
    let values: Vec<i64> = response.take(0).expect("decode values");
    assert!(values.is_empty(), "a new mem:// engine holds no rows");
}

#[tokio::test]
async fn generation_advances_only_with_fresh_clients() {
    let db = memory_db();
    assert_eq!(db.generation(), 0, "nothing opened yet");

    let first = db.collection("items").await.expect("collection");
    db.connect().await.expect("cached client");
    assert_eq!(first.generation(), 1);
    assert_eq!(db.generation(), 1);

    db.close().await;
    assert_eq!(db.generation(), 1, "closing alone does not advance");

    let second = db.collection("items").await.expect("collection after reconnect");
    assert_eq!(second.generation(), 2);
}

#[tokio::test]
async fn unreachable_server_reports_connection_error() {
    let db = Database::builder()
        .url("ws://127.0.0.1:1")
        .session("test_ns", "test_db")
        .connect_timeout(Duration::from_secs(2))
        .build()
        .expect("valid parameters");

    let err = db.connect().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Connection { .. }), "got {err}");
    assert!(!db.is_connected().await, "failed attempts cache nothing");
}

#[tokio::test]
async fn collection_names_are_validated() {
    let db = memory_db();
    let err = db.collection("bad name").await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
    assert!(!db.is_connected().await, "validation happens before connecting");
}

#[tokio::test]
async fn unique_index_reports_conflicts() {
    let db = memory_db();
    let people = db.collection("people").await.expect("collection");
    people.ensure_unique_index("people_natural_key", &["code", "email"]).await.expect("index");
    // Redefining is allowed.
    people.ensure_unique_index("people_natural_key", &["code", "email"]).await.expect("again");

    people
        .query("CREATE people SET code = 1, email = 'a@b.co'")
        .await
        .expect("send")
        .check()
        .expect("first insert");

    let duplicate = people
        .query("CREATE people SET code = 1, email = 'a@b.co'")
        .await
        .expect("send")
        .check()
        .map_err(surrealdb::Error::from);
    let Err(source) = duplicate else { panic!("duplicate key was accepted") };
    let err = DatabaseError::from(source);
    assert!(err.is_conflict(), "expected unique violation, got {err}");

    people
        .query("CREATE people SET code = 1, email = 'other@b.co'")
        .await
        .expect("send")
        .check()
        .expect("different email is a different key");
}
