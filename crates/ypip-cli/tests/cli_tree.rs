use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn ypip_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ypip").unwrap();
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("requirements.txt"), "-r base.txt\nrequests\n").unwrap();
    fs::write(tmp.path().join("base.txt"), "numpy==1.2.3\n").unwrap();
    tmp
}

#[test]
fn test_tree_prints_nested_files() {
    let tmp = project();

    ypip_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["tree"])
        .assert()
        .success()
        .stdout(
            "-r requirements.txt\n\
             └── requirements.txt\n\
             \x20   ├── base.txt\n\
             \x20   │   └── numpy==1.2.3\n\
             \x20   └── requests\n",
        );
}

#[test]
fn test_tree_why() {
    let tmp = project();

    ypip_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["tree", "--why", "numpy"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Path to numpy:\n"))
        .stdout(predicate::str::contains("    base.txt\n"));
}

#[test]
fn test_tree_inverted_unknown_package() {
    let tmp = project();

    ypip_cmd(&tmp)
        .current_dir(tmp.path())
        .args(["tree", "--inverted", "pandas"])
        .assert()
        .success()
        .stdout("Package 'pandas' not found in the graph.\n");
}
