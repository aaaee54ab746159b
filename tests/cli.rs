//! End-to-end CLI tests: run the actual `pdfmd` binary and assert the
//! documented contract: exit codes, usage message, confirmation line, and
//! output-file behaviour.

mod common;

use common::sample_pdf;
use std::path::PathBuf;
use std::process::{Command, Output};

fn pdfmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pdfmd"))
}

fn run(args: &[&str]) -> Output {
    pdfmd().args(args).output().expect("spawn pdfmd binary")
}

fn write_fixture(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

fn stderr_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn stdout_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

// ── Argument-count contract ──────────────────────────────────────────────────

#[test]
fn no_arguments_exits_1_with_usage() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr_of(&out).contains("Usage"),
        "stderr: {}",
        stderr_of(&out)
    );
}

#[test]
fn one_argument_exits_1_with_usage_and_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(&dir, "in.pdf", &sample_pdf(&["page."]));

    let out = run(&[pdf.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_of(&out).contains("Usage"));
    // Nothing was written anywhere in the scratch dir besides the input.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn three_arguments_exit_1_with_usage_and_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(&dir, "in.pdf", &sample_pdf(&["page."]));
    let out_path = dir.path().join("out.md");

    let out = run(&[
        pdf.to_str().unwrap(),
        out_path.to_str().unwrap(),
        "unexpected-extra",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_of(&out).contains("Usage"));
    assert!(!out_path.exists(), "no output file may be created");
}

#[test]
fn help_exits_0() {
    let out = run(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_of(&out).contains("Usage"));
}

// ── Success contract ─────────────────────────────────────────────────────────

#[test]
fn successful_conversion_exit_0_confirmation_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(
        &dir,
        "in.pdf",
        &sample_pdf(&["the quick brown fox jumps over the lazy dog."]),
    );
    let out_path = dir.path().join("out.md");

    let out = run(&[pdf.to_str().unwrap(), out_path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr_of(&out));

    // One-line confirmation mentioning both paths.
    let stdout = stdout_of(&out);
    let confirmation = format!(
        "Converted {} -> {}",
        pdf.display(),
        out_path.display()
    );
    assert_eq!(stdout.trim_end(), confirmation, "stdout: {stdout}");

    // Output file exists, is UTF-8, contains the page text, ends in newline.
    let written = std::fs::read_to_string(&out_path).expect("output is valid UTF-8");
    assert!(written.contains("quick brown fox"), "got: {written}");
    assert!(written.ends_with('\n'));
}

#[test]
fn output_overwritten_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(&dir, "in.pdf", &sample_pdf(&["replacement body."]));
    let out_path = dir.path().join("out.md");
    std::fs::write(&out_path, "previous content that must vanish").unwrap();

    let out = run(&[pdf.to_str().unwrap(), out_path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("replacement body"));
    assert!(!written.contains("previous content"));
}

#[test]
fn quiet_suppresses_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(&dir, "in.pdf", &sample_pdf(&["quiet body."]));
    let out_path = dir.path().join("out.md");

    let out = run(&["-q", pdf.to_str().unwrap(), out_path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_of(&out).is_empty());
    assert!(out_path.exists());
}

// ── Failure contract ─────────────────────────────────────────────────────────

#[test]
fn nonexistent_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("out.md");

    let out = run(&["/no/such/input.pdf", out_path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr_of(&out).contains("not found"),
        "stderr: {}",
        stderr_of(&out)
    );
    assert!(!out_path.exists(), "no output file on failure");
}

#[test]
fn non_pdf_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("fake.pdf");
    std::fs::write(&fake, b"<!DOCTYPE html><html></html>").unwrap();
    let out_path = dir.path().join("out.md");

    let out = run(&[fake.to_str().unwrap(), out_path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr_of(&out).contains("not a valid PDF"),
        "stderr: {}",
        stderr_of(&out)
    );
    assert!(!out_path.exists());
}

#[test]
fn existing_output_untouched_when_conversion_fails() {
    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("fake.pdf");
    std::fs::write(&fake, b"not a pdf at all").unwrap();
    let out_path = dir.path().join("out.md");
    std::fs::write(&out_path, "precious existing content").unwrap();

    let out = run(&[fake.to_str().unwrap(), out_path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        std::fs::read_to_string(&out_path).unwrap(),
        "precious existing content",
        "a failed conversion must not clobber an existing output file"
    );
}

// ── Flag surface ─────────────────────────────────────────────────────────────

#[test]
fn pages_flag_selects_subset() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(
        &dir,
        "in.pdf",
        &sample_pdf(&["alpha body.", "bravo body.", "charlie body."]),
    );
    let out_path = dir.path().join("out.md");

    let out = run(&[
        "--pages",
        "2-3",
        pdf.to_str().unwrap(),
        out_path.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr_of(&out));

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(!written.contains("alpha"));
    assert!(written.contains("bravo"));
    assert!(written.contains("charlie"));
}

#[test]
fn json_flag_writes_structured_output() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(&dir, "in.pdf", &sample_pdf(&["json body."]));
    let out_path = dir.path().join("out.json");

    let out = run(&[
        "--json",
        pdf.to_str().unwrap(),
        out_path.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr_of(&out));

    let written = std::fs::read_to_string(&out_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert!(value["markdown"].as_str().unwrap().contains("json body"));
    assert_eq!(value["stats"]["processed_pages"], 1);
}

#[test]
fn inspect_flag_prints_metadata_only() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(
        &dir,
        "in.pdf",
        &common::sample_pdf_with_info(&["body."], Some(("The Title", "An Author"))),
    );
    let out_path = dir.path().join("out.md");

    let out = run(&[
        "--inspect",
        pdf.to_str().unwrap(),
        out_path.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr_of(&out));
    let stdout = stdout_of(&out);
    assert!(stdout.contains("The Title"), "stdout: {stdout}");
    assert!(stdout.contains("Pages:        1"));
    assert!(!out_path.exists(), "inspect mode writes no output file");
}

#[test]
fn invalid_pages_flag_fails() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(&dir, "in.pdf", &sample_pdf(&["body."]));
    let out_path = dir.path().join("out.md");

    let out = run(&[
        "--pages",
        "9-3",
        pdf.to_str().unwrap(),
        out_path.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!out_path.exists());
}
