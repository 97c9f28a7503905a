//! End-to-end tests against the built binary.
use assert_cmd::Command;
use predicates::prelude::*;

fn multitool() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_multitool"));
    cmd.env_remove("MULTITOOL_SHOW_HIDDEN").env_remove("MULTITOOL_LOG");
    cmd
}

#[test]
fn test_version_flag() {
    multitool()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_command_shows_help() {
    multitool()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: multitool"))
        .stdout(predicate::str::contains("commands"));
}

#[test]
fn test_unknown_command_fails_with_suggestion() {
    multitool()
        .args(["--output", "table", "comands"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No such command 'comands'"))
        .stderr(predicate::str::contains("commands"))
        .stderr(predicate::str::contains("multitool help"));
}

#[test]
fn test_bad_sort_key_rejected() {
    multitool()
        .args(["--profile", "--profile-sort", "badkey", "about"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Profiling").not())
        .stderr(predicate::str::contains("badkey"));
}

#[test]
fn test_commands_json() {
    multitool()
        .args(["commands", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--json"));

    multitool()
        .args(["--json", "commands"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "about""#))
        .stdout(predicate::str::contains(r#""name": "version""#));
}

#[test]
fn test_help_for_command() {
    multitool()
        .args(["help", "commands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: multitool commands"))
        .stdout(predicate::str::contains("--all"));

    multitool().args(["help", "nope"]).assert().code(2);
}

#[test]
fn test_profile_report_on_stdout() {
    multitool()
        .args([
            "--output",
            "table",
            "--profile",
            "--profile-sort",
            "tottime",
            "version",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profiling..."))
        .stdout(predicate::str::contains("Profile sort order: tottime"))
        .stdout(predicate::str::contains("multitool, version"))
        .stdout(predicate::str::contains("Profiling completed"))
        .stdout(predicate::str::contains("Ordered by: internal time"));
}

#[test]
fn test_hidden_options_listed_on_request() {
    multitool()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--profile-sort").not());

    multitool()
        .env("MULTITOOL_SHOW_HIDDEN", "1")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--profile-sort"));
}
