//! Usage and configuration error tests
//!
//! Every case here fails before any audio device is touched.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mp3rec_in(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mp3rec").expect("binary should build");
    cmd.env_remove("MP3REC_OUTPUT")
        .env_remove("MP3REC_SAMPLE_RATE")
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .current_dir(dir.path());
    cmd
}

#[test]
fn negative_sample_rate_is_rejected() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["--sample-rate", "-5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid sample rate"));
    assert!(!dir.path().join("recording.mp3").exists());
}

#[test]
fn zero_sample_rate_is_rejected() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["-r", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid sample rate"));
}

#[test]
fn sample_rate_from_environment_is_validated() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .env("MP3REC_SAMPLE_RATE", "-8000")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid sample rate"));
}

#[test]
fn invalid_duration_error() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["--duration", "invalid"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn unsupported_bitrate_error() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["--bitrate", "100"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported bitrate"));
}

#[test]
fn quality_out_of_range_error() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["--quality", "11"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("quality"));
}

#[test]
fn config_get_unknown_key() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["config", "get", "api_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["config", "set", "volume", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_sample_rate() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["config", "set", "sample_rate", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sample_rate"));
}

#[test]
fn config_set_invalid_duration() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["config", "set", "max_duration", "whenever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_duration"));
}

#[test]
fn config_list_with_no_file() {
    let dir = TempDir::new().unwrap();
    mp3rec_in(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample_rate"))
        .stdout(predicate::str::contains("(not set)"));
}
