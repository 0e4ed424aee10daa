use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
    "media": {
        "@ref": "/media/sample.mov",
        "track": [
            {"@type": "General", "Format": "MPEG-4", "FileSize": "1053651", "Duration": "10.000"},
            {"@type": "Video", "Format": "ProRes", "Format_Profile": "422 HQ", "Width": "1920", "Height": "1080", "BitDepth": "8"},
            {"@type": "Audio", "Format": "AAC", "Channels": "2", "SamplingRate": "48000"},
            {"@type": "Other", "Type": "Time code", "TimeCode_FirstFrame": "00:00:00:00"}
        ]
    }
}"#;

fn saved_document() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.json");
    std::fs::write(&path, DOCUMENT).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

fn mediameta(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mediameta").unwrap();
    // Keep a developer's environment and config file out of the run
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("MEDIAMETA_BACKEND")
        .env_remove("MEDIAMETA_BINARY")
        .env_remove("MEDIAMETA_LIBRARY")
        .env_remove("MEDIAMETA_WITH_EXTRA")
        .env_remove("MEDIAMETA_TIMEOUT")
        .env_remove("MEDIAMETA_LOG_LEVEL");
    cmd
}

#[test]
fn test_inspect_saved_document_as_text() {
    let (dir, path) = saved_document();

    mediameta(&dir)
        .args(["inspect", &path, "--from-json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File: sample.json"))
        .stdout(predicate::str::contains("ProRes 422 HQ 1920x1080"))
        .stdout(predicate::str::contains("10-bit"))
        .stdout(predicate::str::contains("Timecode Tracks (1)"));
}

#[test]
fn test_inspect_saved_document_as_json() {
    let (dir, path) = saved_document();

    let output = mediameta(&dir)
        .args(["inspect", &path, "--from-json", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["general"]["file_size"]["val"], 1053651);
    assert_eq!(tree["video_tracks"][0]["bit_depth"]["val"], 10);
    assert_eq!(tree["audio_tracks"][0]["channels"]["val"], 2);
}

#[test]
fn test_inspect_saved_document_as_yaml() {
    let (dir, path) = saved_document();

    mediameta(&dir)
        .args(["inspect", &path, "--from-json", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file: sample.json"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    mediameta(&dir)
        .args(["inspect", "does-not-exist.json", "--from-json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input not found"));
}

#[test]
fn test_missing_engine_binary_fails() {
    let (dir, path) = saved_document();

    mediameta(&dir)
        .args(["inspect", &path, "--binary", "/nonexistent/mediainfo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("engine unavailable"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mediameta.toml"), "backend = \"ffprobe\"").unwrap();

    mediameta(&dir)
        .args(["engine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();

    mediameta(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("engine"));
}
