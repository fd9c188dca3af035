use std::fs;
use std::path::Path;
use std::process::Command;

fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn write_silent_flac(path: &Path, seconds: u32) {
    let status = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-y"])
        .args(["-f", "lavfi", "-i", "anullsrc=r=44100:cl=stereo"])
        .args(["-t", &seconds.to_string(), "-c:a", "flac"])
        .arg(path)
        .status()
        .expect("failed to run ffmpeg");
    assert!(status.success(), "failed to generate FLAC");
}

fn write_cue(path: &Path, audio_name: &str) {
    let cue = format!(
        r#"PERFORMER "Test Artist"
TITLE "Test Album"
FILE "{}" WAVE
  TRACK 01 AUDIO
    TITLE "One"
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    TITLE "Two"
    INDEX 01 00:01:00
  TRACK 03 AUDIO
    TITLE "Three"
    INDEX 01 00:02:00
"#,
        audio_name
    );
    fs::write(path, cue).expect("failed to write cue file");
}

#[test]
fn splits_generated_silent_flac_without_cover() {
    if !ffmpeg_available() {
        eprintln!("ffmpeg not found, skipping");
        return;
    }

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    write_silent_flac(&dir.path().join("album.flac"), 3);
    write_cue(&dir.path().join("album.cue"), "album.flac");

    let output = Command::new(env!("CARGO_BIN_EXE_cue-split"))
        .env_remove("CUE_SPLIT_FFMPEG")
        .arg(dir.path())
        .arg("album")
        .output()
        .expect("failed to run cue-split");

    assert!(
        output.status.success(),
        "split command failed\nstatus: {:?}\nstdout:\n{}\nstderr:\n{}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let album = dir.path().join("Test Album");
    assert!(album.join("1 One.flac").is_file());
    assert!(album.join("2 Two.flac").is_file());
    assert!(album.join("3 Three.flac").is_file());
    assert!(!album.join("cover.jpg").exists());
    assert!(!album.join("temp 1 One.flac").exists());
}
