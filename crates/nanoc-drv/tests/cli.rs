//! End-to-end tests that exercise the `nanoc` binary directly: a `.c`
//! file goes in, a `.s` file comes out (or a non-zero exit with a
//! diagnostic on stderr).

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_source(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn compiles_a_c_file_to_an_assembly_file_next_to_it() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "main.c", "int main(void) { return 2; }");

    Command::cargo_bin("nanoc").unwrap().arg(&input).assert().success();

    let output = input.with_extension("s");
    assert!(output.exists());
    let asm = std::fs::read_to_string(output).unwrap();
    assert!(asm.contains(".globl"));
}

#[test]
fn missing_argument_exits_with_usage_error() {
    Command::cargo_bin("nanoc")
        .unwrap()
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("usage"));
}

#[test]
fn nonexistent_input_file_fails_with_a_diagnostic() {
    Command::cargo_bin("nanoc")
        .unwrap()
        .arg("/no/such/file.c")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn a_parse_error_is_reported_on_stderr_with_nonzero_exit() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "broken.c", "int main(void) { return 2;");

    Command::cargo_bin("nanoc")
        .unwrap()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));

    assert!(!input.with_extension("s").exists());
}

#[test]
fn a_semantic_error_is_reported_and_no_output_is_written() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "undeclared.c", "int main(void) { return y; }");

    Command::cargo_bin("nanoc")
        .unwrap()
        .arg(&input)
        .assert()
        .failure();

    assert!(!input.with_extension("s").exists());
}
