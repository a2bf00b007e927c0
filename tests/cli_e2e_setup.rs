//! End-to-end tests for `webdev setup` and `webdev generate-env`.
//!
//! Setup runs non-interactively from an answers file.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_setup_from_answers_file() {
    let fixture = TestFixture::new()
        .with_project()
        .with_file("answers.yaml", files::ANSWERS);

    fixture
        .command()
        .args(["setup", "--answers", "answers.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configured services: php7, mysql, hhvm"))
        .stdout(predicate::str::contains("images/php/php.dev.env"))
        .stdout(predicate::str::contains("Removed from yml/docker-compose.yml: redis, nginx"));

    let php_dev = fixture.read("images/php/php.dev.env");
    assert!(php_dev.contains("DB_NAME=shop\n"));
    assert!(php_dev.contains("DB_USER=shopper\n"));
    assert!(php_dev.contains("DB_PASS=secret\n"));
    assert!(php_dev.contains("HTTP_HOST=localhost\n"));

    let mysql_dev = fixture.read("images/mysql/db.dev.env");
    assert!(mysql_dev.contains("MYSQL_ROOT_PASSWORD=root\n"));
    assert!(!mysql_dev.contains("GEN_UP"));

    let main = fixture.read("yml/.env");
    assert!(main.contains("PROJECT_NAME=shop\n"));
    assert!(main.contains("PROXY_HTTP=8080\n"));
    assert!(!main.contains("COMPOSE_PROJECT_NAME"));

    fixture
        .child("config.json")
        .assert(predicate::str::contains("\"service\": \"php7\""))
        .assert(predicate::str::contains("\"path\": \"images/php/php\""))
        .assert(predicate::str::contains("hhvm").not())
        .assert(predicate::str::contains("prompt").not());

    fixture
        .child("yml/docker-compose.yml.orig")
        .assert(predicate::str::contains("redis"));
    fixture
        .child("yml/docker-compose.yml")
        .assert(predicate::str::contains("redis").not())
        .assert(predicate::str::contains("mysql"));
    fixture
        .child("yml/docker-compose.dev.yml")
        .assert(predicate::str::contains("redis").not())
        .assert(predicate::str::contains("/www"));
}

#[test]
fn test_setup_twice_prunes_from_backup() {
    let fixture = TestFixture::new()
        .with_project()
        .with_file("answers.yaml", files::ANSWERS)
        .with_file(
            "redis.yaml",
            "services:\n  services: [redis]\nredis:\n  production:\n    REDIS_PASSWORD: longpassword\n",
        );

    fixture
        .command()
        .args(["setup", "--answers", "answers.yaml"])
        .assert()
        .success();
    fixture
        .command()
        .args(["setup", "--answers", "redis.yaml"])
        .assert()
        .success();

    fixture
        .child("yml/docker-compose.yml")
        .assert(predicate::str::contains("redis:"))
        .assert(predicate::str::contains("php:").not());
    fixture
        .child("yml/docker-compose.yml.orig")
        .assert(files::COMPOSE);
}

#[test]
fn test_setup_rejects_invalid_answer() {
    let fixture = TestFixture::new().with_project().with_file(
        "answers.yaml",
        "services:\n  services: [mysql, mariadb]\n",
    );

    fixture
        .command()
        .args(["setup", "--answers", "answers.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid answer for services.services"))
        .stderr(predicate::str::contains("(mysql)"));

    fixture.child("config.json").assert(predicate::path::missing());
}

#[test]
fn test_setup_strict_requires_dependencies() {
    let fixture = TestFixture::new().with_project().with_file(
        "answers.yaml",
        r#"
services:
  services: [php7]
php:
  development: { PUBLIC_URL: "http://shop.local" }
  production: { PUBLIC_URL: "https://shop.example.com" }
"#,
    );

    fixture
        .command()
        .args(["setup", "--strict", "--answers", "answers.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'mysql' is not configured"));

    // without --strict the pointer is skipped and the defaults stay
    fixture
        .command()
        .args(["setup", "--answers", "answers.yaml"])
        .assert()
        .success();
    let php_dev = fixture.read("images/php/php.dev.env");
    assert!(php_dev.contains("DB_NAME=\"\"\n"));
}

#[test]
fn test_setup_with_schema_override() {
    let fixture = TestFixture::new()
        .with_project()
        .with_file(
            "schemas/redis.yaml",
            "name: redis\npath: custom/redis\ndefaults:\n  dev: { REDIS_MAXMEMORY: 1gb }\n",
        )
        .with_file("answers.yaml", "services:\n  services: [redis]\n");

    fixture
        .command()
        .args(["setup", "--schemas", "schemas", "--answers", "answers.yaml"])
        .assert()
        .success();

    assert_eq!(fixture.read("custom/redis.dev.env"), "REDIS_MAXMEMORY=1gb\n");
}

#[test]
fn test_setup_missing_answers_file() {
    let fixture = TestFixture::new().with_project();
    fixture
        .command()
        .args(["setup", "--answers", "nope.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read answers from nope.yaml"));
}

#[test]
fn test_generate_env_from_manifest() {
    let fixture = TestFixture::new()
        .with_project()
        .with_file("config.json", files::MANIFEST);

    fixture
        .command()
        .arg("generate-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("Env files generated (3)."));

    assert_eq!(
        fixture.read("yml/.env"),
        "PROJECT_NAME=shop\nPROXY_HTTP=8080\n"
    );
    assert_eq!(
        fixture.read("images/redis/cache.dev.env"),
        "REDIS_MAXMEMORY=128mb\nREDIS_PASSWORD=\"\"\n"
    );
    assert_eq!(
        fixture.read("images/redis/cache.env"),
        "REDIS_PASSWORD=\"a long secret\"\n"
    );
}

#[test]
fn test_generate_env_is_idempotent() {
    let fixture = TestFixture::new()
        .with_project()
        .with_file("config.json", files::MANIFEST);

    fixture.command().arg("gen").assert().success();
    let first = fixture.read("images/redis/cache.dev.env");
    fixture.command().arg("gen").assert().success();
    assert_eq!(fixture.read("images/redis/cache.dev.env"), first);
}

#[test]
fn test_generate_env_after_setup_reproduces_files() {
    let fixture = TestFixture::new()
        .with_project()
        .with_file("answers.yaml", files::ANSWERS);

    fixture
        .command()
        .args(["setup", "--answers", "answers.yaml"])
        .assert()
        .success();
    let mysql_prod = fixture.read("images/mysql/db.env");

    fixture.command().arg("generate-env").assert().success();
    assert_eq!(fixture.read("images/mysql/db.env"), mysql_prod);
}

#[test]
fn test_generate_env_without_manifest() {
    let fixture = TestFixture::new().with_project();
    fixture
        .command()
        .arg("generate-env")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration manifest not found"))
        .stderr(predicate::str::contains("webdev setup"));
}
