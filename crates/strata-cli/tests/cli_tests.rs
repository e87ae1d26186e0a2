//! End-to-end tests of the `strata` binary.

use std::{fs, path::Path};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const TWO_LAYERS: &str = r#"
[packages]
tests = "."

[[layers]]
name = "test1"
path = "tests:dir1/"

[[layers]]
name = "test2"
path = "tests:bundle/"

[[filters]]
template = "test1:actions"
name = "test"
"#;

const ONE_LAYER: &str = r#"
[packages]
tests = "."

[[layers]]
name = "test"
path = "tests:dir1/"
"#;

/// Fixture tree with `dir1/` and `bundle/dir1/`, plus `app.toml`.
fn fixture(app_toml: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("dir1")).unwrap();
    fs::create_dir_all(root.join("bundle/dir1")).unwrap();
    fs::write(root.join("dir1/view.pt"), "<div>view</div>").unwrap();
    fs::write(root.join("dir1/actions.pt"), "<ul/>").unwrap();
    fs::write(root.join("bundle/dir1/view.pt"), "<div>custom</div>").unwrap();
    fs::write(root.join("app.toml"), app_toml).unwrap();
    temp
}

fn strata(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("strata");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_action_prints_usage() {
    let temp = fixture(TWO_LAYERS);
    strata(temp.path())
        .arg("app.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("--layers"))
        .stdout(predicate::str::contains("--templates"))
        .stdout(predicate::str::contains("--customize"));
}

#[test]
fn version_flag() {
    let temp = fixture(TWO_LAYERS);
    strata(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn list_layers_without_layers() {
    let temp = fixture("");
    strata(temp.path())
        .args(["app.toml", "-l"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No layers are found."));
}

#[test]
fn list_layers() {
    let temp = fixture(TWO_LAYERS);
    strata(temp.path())
        .args(["app.toml", "-l"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Layer: test1"))
        .stdout(predicate::str::contains("* Layer: test2"));
}

#[test]
fn list_layers_limit() {
    let temp = fixture(TWO_LAYERS);
    strata(temp.path())
        .args(["app.toml", "-l", "test2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Layer: test1").not())
        .stdout(predicate::str::contains("* Layer: test2"));
}

#[test]
fn list_templates() {
    let temp = fixture(TWO_LAYERS);
    strata(temp.path())
        .args(["app.toml", "-lt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Layer: test1"))
        .stdout(predicate::str::contains("tests:dir1/"))
        .stdout(predicate::str::contains("actions: .pt (app.toml: test)"))
        .stdout(predicate::str::contains("* Layer: test2"));
}

#[test]
fn list_templates_limit() {
    let temp = fixture(TWO_LAYERS);
    strata(temp.path())
        .args(["app.toml", "-lt", "test1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Layer: test1"))
        .stdout(predicate::str::contains("actions: .pt"))
        .stdout(predicate::str::contains("* Layer: test2").not());
}

#[test]
fn list_templates_without_layers() {
    let temp = fixture("");
    strata(temp.path())
        .args(["app.toml", "-lt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No layers are found."));
}

#[test]
fn list_as_json() {
    let temp = fixture(TWO_LAYERS);
    let assert = strata(temp.path())
        .args(["--output-format", "json", "app.toml", "-l"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let layers = json["strata:layer"].as_array().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0]["name"], "test1");
}

#[test]
fn customize_template_fmt_bad() {
    let temp = fixture("");
    strata(temp.path())
        .args(["app.toml", "-c", "test", "./"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Template format is wrong."))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn customize_template_no_layers() {
    let temp = fixture("");
    strata(temp.path())
        .args(["app.toml", "-c", "test:template.lt", "./"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Layer \"test\" could not be found."));
}

#[test]
fn customize_template_no_template() {
    let temp = fixture(ONE_LAYER);
    strata(temp.path())
        .args(["app.toml", "-c", "test:template.lt", "./"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains(
            "Template \"test:template.lt\" could not be found.",
        ));
}

#[test]
fn customize_template_no_dest() {
    let temp = fixture(ONE_LAYER);
    strata(temp.path())
        .args(["app.toml", "-c", "test:view.lt", "./blah-blah-blah"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Destination directory is not found."));
}

#[test]
fn customize_success() {
    let temp = fixture(ONE_LAYER);
    let dest = TempDir::new().unwrap();
    strata(temp.path())
        .args(["app.toml", "-c", "test:view.lt"])
        .arg(dest.path())
        .assert()
        .success();

    let copied = dest.path().join("view.pt");
    assert_eq!(fs::read_to_string(copied).unwrap(), "<div>view</div>");
}

#[test]
fn customize_refuses_overwrite_without_force() {
    let temp = fixture(ONE_LAYER);
    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("view.pt"), "edited").unwrap();

    strata(temp.path())
        .args(["app.toml", "-c", "test:view.pt"])
        .arg(dest.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(dest.path().join("view.pt")).unwrap(), "edited");

    strata(temp.path())
        .args(["app.toml", "-c", "test:view.pt"])
        .arg(dest.path())
        .arg("--force")
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dest.path().join("view.pt")).unwrap(),
        "<div>view</div>"
    );
}

#[test]
fn no_color_accepts_any_truthy_value() {
    let temp = fixture(TWO_LAYERS);
    for value in ["1", "true", "yes"] {
        strata(temp.path())
            .env("NO_COLOR", value)
            .args(["app.toml", "-l"])
            .assert()
            .success()
            .stdout(predicate::str::contains("* Layer: test1"));
    }
}

#[test]
fn force_never_truncates_template_in_its_own_layer() {
    let temp = fixture(ONE_LAYER);
    strata(temp.path())
        .args(["app.toml", "-c", "test:view.pt", "dir1", "--force"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("onto itself"));

    assert_eq!(
        fs::read_to_string(temp.path().join("dir1/view.pt")).unwrap(),
        "<div>view</div>"
    );
}

#[test]
fn custom_directory_wins() {
    let temp = fixture(
        r#"
[packages]
tests = "."

[settings]
"layer.custom" = "tests:bundle/"

[[layers]]
name = "dir1"
path = "tests:dir1/"
"#,
    );
    let dest = TempDir::new().unwrap();
    strata(temp.path())
        .args(["app.toml", "-c", "dir1:view.pt"])
        .arg(dest.path())
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dest.path().join("view.pt")).unwrap(),
        "<div>custom</div>"
    );
}
