#![cfg(unix)]

mod common;

use assert_cmd::prelude::*;
use common::Env;
use predicates::prelude::*;
use std::fs;

#[test]
fn creates_note_with_title_and_date() {
    let env = Env::new();
    env.template("greeting", "# {{title}}\nHello <%= date %>");

    env.cmd()
        .args([
            "greeting",
            "home:greeting.md",
            "--date",
            "2024-01-01",
            "--title",
            "Greeting",
            "--removeTitle=false",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK   notegen"))
        .stdout(predicate::str::contains("template: greeting"))
        .stdout(predicate::str::contains("home:greeting.md"));

    let written = fs::read_to_string(env.note("home_greeting.md")).unwrap();
    assert_eq!(written, "# Greeting\nHello 2024-01-01");
    assert_eq!(env.calls(), "show greeting\nadd home:greeting.md\n");
}

#[test]
fn extra_options_become_template_variables() {
    let env = Env::new();
    env.template(
        "task",
        "# Task template\nProject: <%= projectName %>\nOwner: <%= owner ?? 'nobody' %>\nUrgent: <%= urgent %>\n",
    );

    env.cmd()
        .args(["task", "tasks/ship.md", "--project-name", "alpha", "--urgent", "--date=2024-05-05"])
        .assert()
        .success();

    let written = fs::read_to_string(env.note("tasks_ship.md")).unwrap();
    assert_eq!(written, "\nProject: alpha\nOwner: nobody\nUrgent: true\n");
}

#[test]
fn date_helper_formats_invocation_date() {
    let env = Env::new();
    env.template("daily", "# Daily\n## <%= format('%A %-d %B %Y') %>\nTomorrow: <%= format('%Y-%m-%d', '+1d') %>\n");

    env.cmd()
        .args(["daily", "daily.md", "--date", "2024-03-01"])
        .assert()
        .success();

    let written = fs::read_to_string(env.note("daily.md")).unwrap();
    assert_eq!(written, "\n## Friday 1 March 2024\nTomorrow: 2024-03-02\n");
}

#[test]
fn known_parameters_are_in_scope() {
    let env = Env::new();
    env.template("meta", "from <%= template %> to <%= note %>\n");

    env.cmd().args(["meta", "out.md"]).assert().success();

    let written = fs::read_to_string(env.note("out.md")).unwrap();
    assert_eq!(written, "from meta to out.md\n");
}
