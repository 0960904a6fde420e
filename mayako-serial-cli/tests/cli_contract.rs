//! Integration tests for core CLI contract behavior.

use {predicates::prelude::*, std::fs, tempfile::tempdir};

/// Command running in an empty directory with no MAYAKO_* overrides.
fn cli_cmd(dir: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mayako-send");
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    for var in [
        "MAYAKO_INDEX",
        "MAYAKO_BAUD",
        "MAYAKO_KEYWORDS",
        "MAYAKO_NODE",
        "MAYAKO_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_exits_zero_and_writes_stdout_only() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mayako-send"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn version_exits_zero_and_writes_stdout_only() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mayako-send"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn list_commands_prints_catalog_on_stdout() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .arg("--list-commands")
        .assert()
        .success()
        .stdout(predicate::str::contains("available commands"))
        .stdout(predicate::str::contains("3: battery-read"))
        .stdout(predicate::str::contains(r#"{"cmd_name": "SWITCH_OFF"}"#));
}

#[test]
fn list_commands_json_is_valid() {
    let dir = tempdir().expect("tempdir should be created");
    let output = cli_cmd(&dir)
        .args(["--list-commands", "--json"])
        .output()
        .expect("command should execute");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let entries = parsed.as_array().expect("JSON array");
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[3]["name"], "battery-read");
    assert_eq!(entries[3]["payload"], r#"{"cmd_name": "BATTERY_READ"}"#);
}

#[test]
fn dry_run_prints_frame_hex_on_stdout() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .args(["--dry-run", "-i", "3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("22 4D 43 30 31 00 01 7D 00 1C 7B"));
}

#[test]
fn dry_run_by_name_matches_index() {
    let dir = tempdir().expect("tempdir should be created");
    let by_index = cli_cmd(&dir)
        .args(["--dry-run", "-q", "-i", "6"])
        .output()
        .expect("command should execute");
    let by_name = cli_cmd(&dir)
        .args(["--dry-run", "-q", "--command", "switch-off"])
        .output()
        .expect("command should execute");

    assert!(by_index.status.success());
    assert_eq!(by_index.stdout, by_name.stdout);
}

#[test]
fn command_name_wins_over_index_from_environment() {
    let dir = tempdir().expect("tempdir should be created");
    let by_index = cli_cmd(&dir)
        .args(["--dry-run", "-q", "-i", "6"])
        .output()
        .expect("command should execute");
    let by_name = cli_cmd(&dir)
        .env("MAYAKO_INDEX", "3")
        .args(["--dry-run", "-q", "-c", "switch-off"])
        .output()
        .expect("command should execute");

    assert!(by_name.status.success());
    assert_eq!(by_index.stdout, by_name.stdout);
}

#[test]
fn dry_run_json_reports_header() {
    let dir = tempdir().expect("tempdir should be created");
    let output = cli_cmd(&dir)
        .args(["--dry-run", "--json", "-i", "3", "--node", "MC02"])
        .output()
        .expect("command should execute");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(parsed["command"], "battery-read");
    assert_eq!(parsed["node"], "MC02");
    assert_eq!(parsed["checksum"], "0x7d");
    assert_eq!(parsed["payload_len"], 28);
    assert_eq!(parsed["verified"], true);
}

#[test]
fn dry_run_uses_catalog_from_config_file() {
    let dir = tempdir().expect("tempdir should be created");
    fs::write(
        dir.path().join("mayako.toml"),
        r#"
[[command]]
name = "ping"
payload = "{}"
"#,
    )
    .expect("write config");

    cli_cmd(&dir)
        .args(["--dry-run", "-c", "ping"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("22 4D 43 30 31 00 01"))
        .stdout(predicate::str::contains("00 02 7B 7D"));
}

#[test]
fn list_ports_json_returns_valid_json() {
    let dir = tempdir().expect("tempdir should be created");
    let output = cli_cmd(&dir)
        .args(["--list-ports", "--json"])
        .output()
        .expect("command should execute");

    // Hosts without a readable port table fail with a transport code
    if output.status.success() {
        let parsed: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
        assert!(parsed.is_array(), "should be JSON array");
    } else {
        assert_eq!(output.status.code(), Some(4));
    }
}

// ============================================================================
// Exit Code Tests
// ============================================================================

/// Exit code 1: no matching device
#[test]
fn exit_code_one_for_no_matching_device() {
    let dir = tempdir().expect("tempdir should be created");
    let output = cli_cmd(&dir)
        .args(["-i", "3", "--keyword", "NO_SUCH_DEVICE_XYZ"])
        .output()
        .expect("command should execute");

    assert!(output.stdout.is_empty());
    match output.status.code() {
        Some(1) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(stderr.contains("No matching device"), "stderr: {stderr}");
        },
        // Port enumeration itself is unavailable on this host
        code => assert_eq!(code, Some(4)),
    }
}

/// Exit code 2: usage error
#[test]
fn exit_code_two_for_usage_error_invalid_flag() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .arg("--invalid-flag-xyz")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn exit_code_two_for_out_of_range_index() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .args(["-i", "99"])
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid command index 99"));
}

#[test]
fn exit_code_two_for_unknown_command_name() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .args(["--dry-run", "-c", "self-destruct"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown command"));
}

#[test]
fn exit_code_two_for_invalid_node() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .args(["--dry-run", "--node", "TOOLONG"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid node identity"));
}

/// Exit code 3: configuration error
#[test]
fn exit_code_three_for_invalid_explicit_config() {
    let dir = tempdir().expect("tempdir should be created");
    let config = dir.path().join("broken.toml");
    fs::write(&config, "invalid toml [[[").expect("write invalid config");

    cli_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .arg("--list-commands")
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn exit_code_three_for_missing_explicit_config() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .args(["--config", "does_not_exist.toml", "--list-commands"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn exit_code_three_for_empty_configured_catalog() {
    let dir = tempdir().expect("tempdir should be created");
    let config = dir.path().join("empty.toml");
    fs::write(&config, "command = []\n").expect("write config");

    cli_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .arg("--list-commands")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("catalog is empty"));
}

#[test]
fn exit_code_three_for_empty_keyword_list() {
    let dir = tempdir().expect("tempdir should be created");
    fs::write(dir.path().join("mayako.toml"), "[connection]\nkeywords = []\n")
        .expect("write config");

    cli_cmd(&dir)
        .args(["-i", "3"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("keywords must be non-empty"));
}

#[test]
fn invalid_local_config_is_a_warning() {
    let dir = tempdir().expect("tempdir should be created");
    fs::write(dir.path().join("mayako.toml"), "invalid toml [[[").expect("write invalid config");

    cli_cmd(&dir)
        .arg("--list-commands")
        .assert()
        .success()
        .stdout(predicate::str::contains("3: battery-read"))
        .stderr(predicate::str::contains("mayako.toml"));
}

#[test]
fn completions_go_to_stdout() {
    let dir = tempdir().expect("tempdir should be created");
    cli_cmd(&dir)
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mayako-send"));
}
