use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn ypip_cmd() -> Command {
    Command::cargo_bin("ypip").unwrap()
}

#[test]
fn test_check_all_match() {
    ypip_cmd()
        .args(["check", "~= 1.2", "1.2", "1.2.0", "1.3"])
        .assert()
        .success()
        .stdout("1.2 ok\n1.2.0 ok\n1.3 ok\n");
}

#[test]
fn test_check_mismatch_exits_nonzero() {
    ypip_cmd()
        .args(["check", "== 1.2.*", "1.2.3.dev4", "1.3"])
        .assert()
        .code(1)
        .stdout("1.2.3.dev4 ok\n1.3 no\n");
}

#[test]
fn test_check_invalid_specifier() {
    ypip_cmd()
        .args(["check", "=> 1.0", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse"));
}

#[test]
fn test_check_requires_versions() {
    ypip_cmd().args(["check", ">= 1.0"]).assert().failure();
}
