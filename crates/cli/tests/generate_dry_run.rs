#![cfg(unix)]

mod common;

use assert_cmd::prelude::*;
use common::Env;
use predicates::prelude::*;

#[test]
fn dry_run_prints_without_writing() {
    let env = Env::new();
    env.template(
        "meeting",
        "# Meeting template\n\nDate: <%= date %>\nWith: <%= with ?? 'team' %>\n\n# Notes\n",
    );

    env.cmd()
        .args(["meeting", "work:meetings/sync.md", "--date", "2024-01-01", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout("\n\nDate: 2024-01-01\nWith: team\n\n# Notes\n");

    assert_eq!(env.calls(), "show meeting\n");
    assert!(!env.note("work_meetings_sync.md").exists());
}

#[test]
fn dry_run_with_title_keeps_other_headings() {
    let env = Env::new();
    env.template("t", "intro\n# Old\n## Keep\n# Keep too");

    let assert = env
        .cmd()
        .args(["t", "n.md", "--title", "New", "--dry-run=true"])
        .assert()
        .success();

    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    insta::assert_snapshot!(out, @r"
    intro
    # New
    ## Keep
    # Keep too
    ");

    assert_eq!(env.calls(), "show t\n");
}

#[test]
fn dry_run_keeps_heading_when_remove_title_false() {
    let env = Env::new();
    env.template("t", "# Template\nbody\n");

    env.cmd()
        .args(["--dry-run", "--remove-title=false", "t", "n.md"])
        .assert()
        .success()
        .stdout("# Template\nbody\n");
}

#[test]
fn boolean_options_accept_space_separated_values() {
    let env = Env::new();
    env.template("t", "# Template\nbody\n");

    env.cmd()
        .args(["t", "n.md", "--removeTitle", "false", "--dry-run", "true"])
        .assert()
        .success()
        .stdout("# Template\nbody\n");

    assert_eq!(env.calls(), "show t\n");
    assert!(!env.note("n.md").exists());
}
