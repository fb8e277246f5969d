//! End-to-end tests for the `fieldcheck` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RULES: &str = r#"{
    "rules": {
        "id": ["required", "integer"],
        "email": ["required", "email"]
    },
    "messages": {"email.email": "Please give us a real address."}
}"#;

fn fieldcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fieldcheck").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("FIELDCHECK_LOCALE")
        .env_remove("FIELDCHECK_CATALOG");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn check_valid_payload_prints_it() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", RULES);
    let data = write(&dir, "data.json", r#"{"id": 7, "email": "a@b.com"}"#);

    fieldcheck(&dir)
        .args(["check", "--rules"])
        .arg(&rules)
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"email\": \"a@b.com\""));
}

#[test]
fn check_reads_payload_from_stdin() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", RULES);

    fieldcheck(&dir)
        .args(["check", "--rules"])
        .arg(&rules)
        .write_stdin(r#"{"id": "12", "email": "a@b.com"}"#)
        .assert()
        .success();
}

#[test]
fn check_failure_reports_status_and_message() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", RULES);

    fieldcheck(&dir)
        .args(["check", "--rules"])
        .arg(&rules)
        .write_stdin(r#"{"id": 1, "email": "nope"}"#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("400: Please give us a real address."));
}

#[test]
fn check_fails_fast_in_declaration_order() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", RULES);

    fieldcheck(&dir)
        .args(["check", "--rules"])
        .arg(&rules)
        .write_stdin(r#"{"id": "abc", "email": "nope"}"#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("The id field must be an integer."));
}

#[test]
fn check_unknown_rule_is_configuration_exit() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", r#"{"rules": {"a": "sparkly"}}"#);

    fieldcheck(&dir)
        .args(["check", "--rules"])
        .arg(&rules)
        .write_stdin(r#"{"a": 1}"#)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown rule 'sparkly'"));
}

#[test]
fn check_accepts_toml_manifests() {
    let dir = TempDir::new().unwrap();
    let rules = write(
        &dir,
        "rules.toml",
        "[rules]\nage = [\"required\", \"min:18\"]\n\n[messages]\n\"age.min\" = \"Adults only.\"\n",
    );

    fieldcheck(&dir)
        .args(["check", "--rules"])
        .arg(&rules)
        .write_stdin(r#"{"age": 12}"#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Adults only."));
}

#[test]
fn check_uses_locale_catalog() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", r#"{"rules": {"name": "required"}}"#);
    let catalog = write(
        &dir,
        "fr.json",
        r#"{"validation": {"required": "Le champ {0} est obligatoire."}}"#,
    );

    fieldcheck(&dir)
        .args(["--locale", "fr", "--catalog"])
        .arg(&catalog)
        .args(["check", "--rules"])
        .arg(&rules)
        .write_stdin("{}")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Le champ name est obligatoire."));
}

#[test]
fn config_file_sets_locale() {
    let dir = TempDir::new().unwrap();
    write(&dir, "fieldcheck.toml", "locale = \"de\"\n");
    let rules = write(&dir, "rules.json", r#"{"rules": {"name": "required"}}"#);

    // German has no messages, so the English fallback is used.
    fieldcheck(&dir)
        .args(["check", "--rules"])
        .arg(&rules)
        .write_stdin("{}")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("The name field is required."));
}

#[test]
fn check_invalid_payload_json() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", RULES);

    fieldcheck(&dir)
        .args(["check", "--rules"])
        .arg(&rules)
        .write_stdin("{not json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("payload is not valid JSON"));
}

#[test]
fn parse_prints_name_and_param() {
    let dir = TempDir::new().unwrap();

    fieldcheck(&dir)
        .args(["parse", "regex: ^a:b$ "])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"regex""#))
        .stdout(predicate::str::contains(r#""param":"^a:b$""#));

    fieldcheck(&dir).args(["parse", "   "]).assert().code(2);
}

#[test]
fn rules_lists_builtins_and_presence_rules() {
    let dir = TempDir::new().unwrap();

    fieldcheck(&dir)
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("datetime"))
        .stdout(predicate::str::contains("requiredwithout"))
        .stdout(predicate::str::contains("nullable"));
}
