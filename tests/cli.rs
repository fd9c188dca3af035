use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run(dir: Option<&Path>, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cue-split"));
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    command
        .env("CUE_SPLIT_FFMPEG", "cue-split-test-no-such-ffmpeg")
        .args(args)
        .output()
        .expect("failed to run cue-split")
}

fn run_with_input(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cue-split"))
        .current_dir(dir)
        .env("CUE_SPLIT_FFMPEG", "cue-split-test-no-such-ffmpeg")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run cue-split");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write answer");
    child.wait_with_output().expect("failed to wait for cue-split")
}

fn write_album(dir: &Path) {
    fs::write(
        dir.join("album.cue"),
        r#"PERFORMER "Test Artist"
TITLE "Test: Album"
FILE "album.flac" WAVE
  TRACK 01 AUDIO
    TITLE "One"
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    TITLE "Two"
    INDEX 01 00:01:00
"#,
    )
    .expect("failed to write cue file");
    fs::write(dir.join("album.flac"), b"not really flac").expect("failed to write audio file");
}

#[test]
fn wrong_argument_count_prints_usage() {
    let output = run(None, &["only-one"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));

    let output = run(None, &["a", "b", "c"]);
    assert!(!output.status.success());
}

#[test]
fn missing_directory_or_cue_fails() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let missing = dir.path().join("nowhere");
    let output = run(None, &[missing.to_str().unwrap(), "album"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));

    let output = run(None, &[dir.path().to_str().unwrap(), "album"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("album.cue"));
}

#[test]
fn dry_run_prints_commands_without_touching_files() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    write_album(dir.path());

    let output = run(Some(dir.path()), &["-n", ".", "album"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "dry run failed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("cue-split-test-no-such-ffmpeg"));
    assert!(stdout.contains("00:00:01.0"));
    assert!(stdout.contains("title=One"));
    assert!(stdout.contains("'album=Test: Album'"));
    assert!(stdout.contains("1 One.flac"));
    assert!(!dir.path().join("Test Album").exists());
}

#[test]
fn missing_transcoder_is_a_fatal_error() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    write_album(dir.path());

    let output = run(Some(dir.path()), &[".", "album.cue"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to start"));
}

#[test]
fn reads_corrected_audio_name_from_piped_stdin() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    write_album(dir.path());
    fs::rename(dir.path().join("album.flac"), dir.path().join("real.flac"))
        .expect("failed to rename audio file");

    let output = run_with_input(dir.path(), &["-n", ".", "album"], "real.flac\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "dry run failed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stderr.contains("Enter audio file name"));
    assert!(stdout.contains("real.flac"));
    assert!(stdout.contains("1 One.flac"));

    let output = run_with_input(dir.path(), &["-n", ".", "album"], "still-missing.flac\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("still-missing.flac"));
}
