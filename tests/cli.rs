use assert_cmd::Command;
use predicates::prelude::*;

fn closures() -> Command {
    Command::cargo_bin("closures").unwrap()
}

#[test]
fn demo_without_arguments() {
    closures().assert().success().stdout("-2 201 -4\n");
}

#[test]
fn runs_counter_script() {
    closures()
        .arg("scripts/counter.js")
        .assert()
        .success()
        .stdout("-2 201 -4\n");
}

#[test]
fn runs_object_script() {
    closures()
        .arg("scripts/object.js")
        .assert()
        .success()
        .stdout("o1\no2\no3\no2\n");
}

#[test]
fn reports_undefined_variable() {
    closures()
        .arg("tests/fixtures/undefined.js")
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Undefined variable inc3"));
}

#[test]
fn reports_unclosed_delimiter() {
    closures()
        .arg("tests/fixtures/unclosed.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unclosed delimiter {"));
}

#[test]
fn missing_script() {
    closures()
        .arg("tests/fixtures/missing.js")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Cannot read"));
}
