use rollcall_kernel::domain::config::ApiConfig;
use rollcall_registration::{MemoryRegistrationStore, Registrations, init, init_with_store};
use rollcall_database::Database;
use std::any::TypeId;
use std::sync::Arc;

#[test]
fn init_registers_the_slice() {
    let mut config = ApiConfig::default();
    config.security.admin_key = Some("s3cret".to_owned());

    let slice = init_with_store(&config, Arc::new(MemoryRegistrationStore::new()));
    assert_eq!(slice.id, TypeId::of::<Registrations>());

    let registrations = slice.downcast_ref::<Registrations>().expect("registrations slice");
    assert!(registrations.admin_key.is_some());
}

#[test]
fn blank_admin_key_disables_export() {
    let mut config = ApiConfig::default();
    config.security.admin_key = Some("   ".to_owned());

    let slice = init_with_store(&config, Arc::new(MemoryRegistrationStore::new()));
    let registrations = slice.downcast_ref::<Registrations>().expect("registrations slice");
    assert!(registrations.admin_key.is_none());
}

#[test]
fn init_uses_the_configured_collection() {
    let mut config = ApiConfig::default();
    let db = Database::builder().url("mem://").session("ns", "db").build().expect("db");

    assert!(init(&config, &db).is_ok());

    config.database.collection = "not valid".to_owned();
    assert!(init(&config, &db).is_err());
}
