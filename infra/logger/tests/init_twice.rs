use rollcall_logger::{Logger, LoggerError};

#[test]
fn second_subscriber_is_rejected() -> Result<(), LoggerError> {
    let first = Logger::builder().name("integration-first").level_str("info")?.init()?;
    assert!(!first.writes_files(), "console-only logger holds no file guard");

    let err = Logger::builder()
        .name("integration-second")
        .level_str("warn")?
        .init()
        .expect_err("second init should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }), "got {err}");
    Ok(())
}
