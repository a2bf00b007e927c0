//! End-to-end tests for `webdev completions`.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_bash_completions() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_webdev()"))
        .stdout(predicate::str::contains("generate-env"))
        .stdout(predicate::str::contains("get-in"))
        .stdout(predicate::str::contains("loadbalancer"));
}

#[test]
fn test_zsh_and_fish_completions() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef webdev"));
    fixture
        .command()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete -c webdev"));
}

#[test]
fn test_unknown_shell() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["completions", "tcsh"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("possible values"));
}
