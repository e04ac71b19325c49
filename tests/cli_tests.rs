use predicates::prelude::*;
use std::fs;

use test_env::TestEnv;

#[test]
fn test_version() {
    let env = TestEnv::new();
    env.cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(format!("tasq {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_needs_no_login() {
    let env = TestEnv::new();
    env.cmd()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("tasq done [--list <list-name>] <ref>..."))
        .stdout(predicate::str::contains("--config <dir>"));
}

#[test]
fn test_commands_require_login() {
    let env = TestEnv::new();
    env.cmd()
        .assert()
        .failure()
        .code(2)
        .stderr("error: not logged in (run: tasq login)\n");
    env.cmd()
        .args(["add", "Buy milk"])
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("error: not logged in"));
}

#[test]
fn test_flags_before_command_are_rejected() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--quiet")
        .assert()
        .code(1)
        .stdout("")
        .stderr("error: unknown command: --quiet\n");
}

#[test]
fn test_unknown_command() {
    let env = TestEnv::new();
    env.cmd()
        .arg("frobnicate")
        .assert()
        .code(1)
        .stderr("error: unknown command: frobnicate\n");
}

#[test]
fn test_login_logout_cycle() {
    let env = TestEnv::new();
    env.cmd().arg("login").assert().success().stdout("ok\n");
    env.cmd().arg("login").assert().success().stdout("already logged in\n");
    env.cmd().arg("logout").assert().success().stdout("ok\n");
    env.cmd().arg("logout").assert().success().stdout("not logged in\n");
    env.cmd().arg("lists").assert().code(2);
}

#[test]
fn test_add_list_done_round_trip() {
    let env = TestEnv::logged_in();

    env.cmd().args(["add", "Buy", "milk"]).assert().success().stdout("ok\n");
    env.cmd().args(["add", "Call mom"]).assert().success();
    env.cmd().args(["createlist", "Shopping"]).assert().success();
    env.cmd().args(["add", "-l", "shopping", "Eggs"]).assert().success();
    env.cmd().args(["create", "--list=Shopping", "Bread"]).assert().success();

    env.cmd().assert().success().stdout(
        "   1  Buy milk\n\
         \x20  2  Call mom\n\
         ------------\n\
         Shopping\n\
         ------------\n\
         \x20     a1  Eggs\n\
         \x20     a2  Bread\n",
    );

    env.cmd().args(["done", "a1", "2"]).assert().success().stdout("ok\n");

    env.cmd().assert().success().stdout(
        "   1  Buy milk\n\
         ------------\n\
         Shopping\n\
         ------------\n\
         \x20     a1  Bread\n",
    );
}

#[test]
fn test_quiet_suppresses_ok() {
    let env = TestEnv::logged_in();
    env.cmd().args(["add", "--quiet", "Silent"]).assert().success().stdout("");
    env.cmd()
        .args(["list", "My Tasks"])
        .assert()
        .success()
        .stdout("------------\nMy Tasks [default]\n------------\n       1  Silent\n");
}

#[test]
fn test_out_of_range_reference() {
    let env = TestEnv::logged_in();
    env.cmd().args(["add", "only task"]).assert().success();
    env.cmd()
        .args(["rm", "5"])
        .assert()
        .code(1)
        .stderr("error: task number out of range: 5\n");
}

#[test]
fn test_lists_and_rmlist() {
    let env = TestEnv::logged_in();
    env.cmd().args(["addlist", "Work"]).assert().success();
    env.cmd().args(["add", "--list", "work", "Report"]).assert().success();

    env.cmd()
        .arg("lists")
        .assert()
        .success()
        .stdout("My Tasks [default]\nWork\n");

    env.cmd()
        .args(["rmlist", "Work"])
        .assert()
        .code(1)
        .stderr("error: list not empty (use --force)\n");
    env.cmd()
        .args(["rmlist", "my tasks"])
        .assert()
        .code(1)
        .stderr("error: cannot delete default list\n");
    env.cmd().args(["rmlist", "--force", "Work"]).assert().success();
    env.cmd().arg("lists").assert().stdout("My Tasks [default]\n");
}

#[test]
fn test_explicit_config_dir_and_rc() {
    let env = TestEnv::new();
    let config_dir = env.dir.path().join("custom");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("rc"), "data.location=tasks/main.db\n").unwrap();
    let config = config_dir.to_str().unwrap();

    env.cmd().args(["login", "--config", config]).assert().success();
    assert!(config_dir.join("session.json").exists());
    assert!(config_dir.join("tasks").join("main.db").exists());

    env.cmd().args(["add", "--config", config, "Configured"]).assert().success();
    env.cmd()
        .args(["list", "--config", config])
        .assert()
        .success()
        .stdout("   1  Configured\n");

    // the default config directory has no session
    env.cmd().arg("list").assert().code(2);
}

#[test]
fn test_bad_rc_is_a_config_error() {
    let env = TestEnv::new();
    let config_dir = env.dir.path().join("broken");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("rc"), "timeout.secs=later\n").unwrap();

    env.cmd()
        .args(["version", "--config", config_dir.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr("error: invalid config value for timeout.secs: later\n");
}

#[test]
fn test_debug_logs_go_to_stderr() {
    let env = TestEnv::logged_in();
    env.cmd()
        .args(["lists", "--debug"])
        .assert()
        .success()
        .stdout("My Tasks [default]\n")
        .stderr(predicate::str::contains("command lists"));

    env.cmd().arg("lists").assert().success().stderr("");
}
