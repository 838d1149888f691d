use rollcall_logger::{LevelFilter, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_logging_writes_structured_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("integration-json")
        .console(false)
        .directory(Some(&log_dir))
        .json(true)
        .level(LevelFilter::INFO)
        .init()?;

    tracing::info!(roll_number = 7, "registration stored");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let line = contents.lines().next().expect("at least one line");
    assert!(line.starts_with('{'), "json layer should emit objects: {line}");
    assert!(line.contains("registration stored"));
    Ok(())
}
