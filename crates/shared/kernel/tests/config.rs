use rollcall_kernel::config::{ConfigError, load_config};
use rollcall_kernel::domain::config::ApiConfig;
use std::fs;
use tempfile::tempdir;

#[test]
fn file_values_override_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("server.toml");
    fs::write(
        &path,
        r#"
[server]
port = 8081

[cors]
allowed_origin = "https://form.example.org"

[database]
url = "ws://db:8000"
collection = "applicants"
"#,
    )?;

    let cfg: ApiConfig = load_config(Some(&path))?;
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.cors.allowed_origin, "https://form.example.org");
    assert_eq!(cfg.database.url, "ws://db:8000");
    assert_eq!(cfg.database.collection, "applicants");
    // Untouched sections keep their defaults.
    assert_eq!(cfg.database.namespace, "rollcall");
    assert_eq!(cfg.cors.max_age_seconds, 3600);
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("nope.toml");

    let err = load_config::<ApiConfig>(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::Config { .. }));
    assert!(err.to_string().contains("Failed to build config"), "got {err}");
}

#[test]
fn malformed_values_fail_deserialization() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("server.toml");
    fs::write(&path, "[server]\nport = \"not a port\"\n")?;

    let err = load_config::<ApiConfig>(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"), "got {err}");
    Ok(())
}
