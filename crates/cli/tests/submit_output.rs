use std::process::{Command, Output};

fn askq(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_askq"))
        .args(args)
        .env_remove("ASKQ_CONFIG")
        .env_remove("ASKQ_AUTHOR_ID")
        .env_remove("ASKQ_AUTHOR_NAME")
        .env_remove("ASKQ_SUBMIT_TIMEOUT_SECS")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run askq")
}

#[test]
fn submit_prints_only_payload_json_on_stdout() {
    let output = askq(&[
        "submit",
        "--title",
        "Is aspirin safe daily?",
        "--tag",
        "Healthcare",
        "--author-id",
        "u-7",
        "--author-name",
        "Riley Chen",
    ]);

    assert!(output.status.success());

    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be the payload JSON");
    assert_eq!(payload["title"], "Is aspirin safe daily?");
    assert_eq!(payload["tags"], serde_json::json!(["Healthcare"]));
    assert_eq!(payload["author"]["name"], "Riley Chen");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Question submitted successfully!"));
}

#[test]
fn blocked_submit_writes_nothing_to_stdout() {
    let output = askq(&[
        "submit",
        "--title",
        "Hi",
        "--author-id",
        "u-7",
        "--author-name",
        "Riley Chen",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Question title must be at least 10 characters"));
    assert!(stderr.contains("Please select at least one tag"));
}
