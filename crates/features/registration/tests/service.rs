mod support;

use rollcall_database::Database;
use rollcall_registration::{
    FIELDS, MemoryRegistrationStore, RegistrationError, RegistrationService, RegistrationStore,
    SurrealRegistrationStore,
};
use std::sync::Arc;
use support::submission;

fn memory_service() -> (Arc<MemoryRegistrationStore>, RegistrationService) {
    let store = Arc::new(MemoryRegistrationStore::new());
    (store.clone(), RegistrationService::new(store))
}

fn surreal_service() -> (SurrealRegistrationStore, RegistrationService) {
    let db = Database::builder().url("mem://").session("test", "registration").build().expect("db");
    let store = SurrealRegistrationStore::new(db, "registrations").expect("store");
    (store.clone(), RegistrationService::new(Arc::new(store)))
}

#[tokio::test]
async fn valid_submission_is_stored_once() {
    let (store, service) = memory_service();

    let stored = service.submit(submission(1, "grace@navy.mil")).await.expect("stored");
    assert_eq!(stored.github_link, None, "blank optionals are dropped");
    assert_eq!(store.len(), 1);

    let err = service.submit(submission(1, "grace@navy.mil")).await.unwrap_err();
    assert!(matches!(err, RegistrationError::Duplicate { .. }), "got {err}");
    assert_eq!(store.len(), 1, "a duplicate writes nothing");

    service.submit(submission(1, "other@navy.mil")).await.expect("different email");
    service.submit(submission(2, "grace@navy.mil")).await.expect("different roll number");
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn invalid_submission_writes_nothing() {
    let (store, service) = memory_service();

    let mut record = submission(1, "grace@navy.mil");
    record["gender"] = "X".into();
    let err = service.submit(record).await.unwrap_err();

    assert!(matches!(err, RegistrationError::Validation { .. }));
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn export_renders_stored_rows() {
    let (_, service) = memory_service();
    assert_eq!(service.export_csv().await.expect("empty export"), "");

    service.submit(submission(7, "grace@navy.mil")).await.expect("stored");
    let csv = service.export_csv().await.expect("export");

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(FIELDS.join(",").as_str()));
    assert_eq!(
        lines.next(),
        Some("\"Grace Hopper\",7,\"F\",\"grace@navy.mil\",\"Compilers, \"\"bugs\"\" and COBOL\",,,,\"Navy\",,")
    );
    assert_eq!(lines.next(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicates_admit_one_winner_in_memory() {
    let (store, service) = memory_service();

    let attempts = (0..8).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.submit(submission(5, "race@navy.mil")).await })
    });

    let mut wins = 0;
    for attempt in attempts.collect::<Vec<_>>() {
        match attempt.await.expect("task") {
            Ok(_) => wins += 1,
            Err(RegistrationError::Duplicate { .. }) => {},
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn surreal_store_enforces_natural_key() {
    let (store, service) = surreal_service();

    service.submit(submission(1, "grace@navy.mil")).await.expect("stored");
    let err = service.submit(submission(1, "grace@navy.mil")).await.unwrap_err();
    assert!(matches!(err, RegistrationError::Duplicate { .. }), "got {err}");

    // Bypass the lookup: the unique index must still refuse the second row.
    let registration =
        rollcall_registration::Registration::parse(submission(1, "grace@navy.mil")).expect("valid");
    let err = store.insert(&registration).await.unwrap_err();
    assert!(matches!(err, RegistrationError::Duplicate { .. }), "got {err}");

    let documents = store.find_all().await.expect("read back");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].keys().map(String::as_str).collect::<Vec<_>>(), FIELDS);
    assert_eq!(documents[0]["team_name"], "Navy");
    assert!(documents[0]["github_link"].is_null());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicates_admit_at_most_one_winner_in_surreal() {
    let (store, service) = surreal_service();

    let attempts: Vec<_> = (0..6)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.submit(submission(9, "race@navy.mil")).await })
        })
        .collect();

    let mut wins = 0;
    for attempt in attempts {
        if attempt.await.expect("task").is_ok() {
            wins += 1;
        }
    }

    assert!(wins <= 1);
    assert_eq!(store.find_all().await.expect("read back").len(), wins);
}

#[tokio::test]
async fn natural_key_index_survives_reconnect() {
    let db = Database::builder().url("mem://").session("test", "registration").build().expect("db");
    let store = SurrealRegistrationStore::new(db.clone(), "registrations").expect("store");
    let registration =
        rollcall_registration::Registration::parse(submission(4, "grace@navy.mil")).expect("valid");

    store.insert(&registration).await.expect("first insert");
    db.close().await;

    // The reopened mem:// engine starts empty; the index must be defined again.
    store.insert(&registration).await.expect("insert into the fresh store");
    let err = store.insert(&registration).await.unwrap_err();
    assert!(matches!(err, RegistrationError::Duplicate { .. }), "got {err}");
    assert_eq!(store.find_all().await.expect("read back").len(), 1);
}

#[tokio::test]
async fn invalid_table_name_is_refused_up_front() {
    let db = Database::builder().url("mem://").session("test", "registration").build().expect("db");
    let err = SurrealRegistrationStore::new(db, "registrations; REMOVE TABLE x").unwrap_err();
    assert!(matches!(err, RegistrationError::Store { .. }));
}
