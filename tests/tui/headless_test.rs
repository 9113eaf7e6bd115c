//! Integration tests for headless mode.

use std::process::Command;

/// Runs the binary headless against the in-memory API.
fn run_headless(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_smart-search"))
        .args(["--headless", "--mock-api", "--config", "/nonexistent/smart-search.toml"])
        .args(args)
        .env_remove("SMART_SEARCH_API_URL")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

fn run_json(events: &str) -> (i32, serde_json::Value) {
    let (code, stdout, stderr) = run_headless(&["--events", events, "--output", "json"]);
    let json = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}\nstderr: {stderr}"));
    (code, json)
}

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_headless(&["--events", "key:esc"]);

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(stdout.contains("Smart Search"));
    assert!(
        stdout.contains("Events: 1 executed"),
        "Should show events executed"
    );
}

#[test]
fn test_headless_type_and_wait() {
    let (code, json) = run_json("type:re,wait:400ms");

    assert_eq!(code, 0);
    assert_eq!(json["state"]["query"], "re");
    assert_eq!(json["state"]["exact_count"], 3);
    assert_eq!(json["state"]["selected"], -1);
    assert_eq!(json["state"]["loading"], false);
    assert!(json["screen"].as_str().unwrap().contains("Exact Matches"));
}

#[test]
fn test_headless_nothing_before_debounce() {
    let (code, json) = run_json("type:re");

    assert_eq!(code, 0);
    assert_eq!(json["state"]["query"], "re");
    assert_eq!(json["state"]["exact_count"], 0);
}

#[test]
fn test_headless_navigate_and_commit() {
    let (code, json) = run_json("type:re,wait:400ms,key:down,key:down,key:enter");

    assert_eq!(code, 0);
    assert_eq!(json["state"]["query"], "redis");
    assert_eq!(json["state"]["exact_count"], 0);
    assert_eq!(json["state"]["fuzzy_count"], 0);
}

#[test]
fn test_headless_assertion_pass() {
    let (code, json) = run_json(
        "type:re,wait:400ms,assert:contains:react,assert:state:exact_count>=3,assert:state:selected=-1",
    );

    assert_eq!(code, 0);
    assert_eq!(json["assertions"]["passed"], 3);
    assert_eq!(json["assertions"]["failed"], 0);
}

#[test]
fn test_headless_assertion_fail() {
    let (code, json) = run_json("type:re,wait:400ms,assert:contains:kubernetes");

    assert_eq!(code, 1, "Should exit with code 1 on assertion failure");
    assert_eq!(json["assertions"]["passed"], 0);
    assert_eq!(json["assertions"]["failed"], 1);
}

#[test]
fn test_headless_fail_fast() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:re,assert:contains:nowhere,type:d",
        "--fail-fast",
        "--output",
        "json",
    ]);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(code, 1);
    assert_eq!(json["state"]["query"], "re");
}

#[test]
fn test_headless_frames_output() {
    let (code, stdout, _) = run_headless(&["--events", "type:re,wait:400ms", "--output", "frames"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 2 (wait:400ms) ==="));
    assert!(stdout.contains("Total: 3 frames"));
}

#[test]
fn test_headless_custom_size() {
    let (code, json) = {
        let (code, stdout, _) =
            run_headless(&["--events", "key:esc", "--size", "60x10", "--output", "json"]);
        (code, serde_json::from_str::<serde_json::Value>(&stdout).unwrap())
    };

    assert_eq!(code, 0);
    let lines = json["screen_lines"].as_array().unwrap();
    assert!(lines.len() <= 10);
    assert!(lines.iter().all(|l| l.as_str().unwrap().chars().count() <= 60));
}

#[test]
fn test_headless_missing_events() {
    let (code, _, stderr) = run_headless(&[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("--events or --script"));
}

#[test]
fn test_headless_invalid_event() {
    let (code, _, stderr) = run_headless(&["--events", "jump:high"]);

    assert_eq!(code, 1);
    assert!(!stderr.is_empty());
}

#[test]
fn test_headless_click_picks_suggestion() {
    let (code, json) = run_json("type:re,wait:400ms,click:10:7");

    assert_eq!(code, 0);
    assert_eq!(json["state"]["query"], "redis");
    assert_eq!(json["state"]["exact_count"], 0);
}

#[test]
fn test_headless_fallback_add_term() {
    let (code, json) = run_json(
        "type:zzzz,wait:400ms,assert:contains:No results found,assert:state:fallback=true,click:5:7,wait:100ms",
    );

    assert_eq!(code, 0);
    assert_eq!(json["assertions"]["passed"], 2);
    assert_eq!(json["state"]["message"], "Term added successfully!");
    assert_eq!(json["state"]["exact_count"], 1);
    assert!(json["screen"].as_str().unwrap().contains("Term added successfully!"));
}

#[test]
fn test_headless_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.txt");
    std::fs::write(
        &script,
        "# look up redux\ntype:redu\nwait:400ms\nassert:contains:redux\nkey:down\nkey:enter\n",
    )
    .unwrap();

    let (code, stdout, _) =
        run_headless(&["--script", script.to_str().unwrap(), "--output", "json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(code, 0);
    assert_eq!(json["assertions"]["passed"], 1);
    assert_eq!(json["state"]["query"], "redux");
}
