use std::process::Command;

#[test]
fn test_exits_non_zero_when_database_is_unreachable() {
    let output = Command::new(env!("CARGO_BIN_EXE_tennis-rating-processor"))
        .env(
            "CONNECTION_STRING",
            "host=127.0.0.1 port=1 user=postgres password=wrong dbname=nonexistent connect_timeout=2"
        )
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute processor");

    assert!(!output.status.success(), "Process should fail with invalid connection");
}

#[test]
fn test_rejects_unknown_model() {
    let output = Command::new(env!("CARGO_BIN_EXE_tennis-rating-processor"))
        .args(["--connection-string", "postgresql://localhost/db", "--models", "elo,whr"])
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute processor");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown model"));
}
