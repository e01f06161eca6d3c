use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ytsound(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ytsound").unwrap();
    cmd.current_dir(workdir.path())
        .env("HOME", workdir.path())
        .env("XDG_CONFIG_HOME", workdir.path().join("config"))
        .env_remove("RUST_LOG");
    cmd
}

/// Workdir whose config.yaml points at tools that do not exist
fn workdir_without_tools() -> TempDir {
    let dir = TempDir::new().unwrap();
    let config = format!(
        "output_dir: {}\ndefault_extension: null\npreferred_source_ext: m4a\ntools:\n  yt_dlp: ytsound-missing-yt-dlp\n  ffmpeg: ytsound-missing-ffmpeg\n  ffmpeg_loglevel: warning\n",
        dir.path().join("music").display()
    );
    std::fs::write(dir.path().join("config.yaml"), config).unwrap();
    dir
}

#[test]
fn test_help_lists_options() {
    let dir = TempDir::new().unwrap();
    ytsound(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--extension"))
        .stdout(predicate::str::contains("--filename"));
}

#[test]
fn test_url_is_required() {
    let dir = TempDir::new().unwrap();
    ytsound(&dir)
        .args(["-i", "1:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url"));
}

#[test]
fn test_show_config() {
    let dir = workdir_without_tools();
    ytsound(&dir)
        .arg("--show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Configuration"))
        .stdout(predicate::str::contains("ytsound-missing-yt-dlp"));
}

#[test]
fn test_unresolvable_source_reports_invalid_url() {
    let dir = workdir_without_tools();
    ytsound(&dir)
        .args(["-q", "-u", "https://www.youtube.com/watch?v=abc", "-i", "1", "2", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency check warnings"))
        .stderr(predicate::str::contains("Invalid url"))
        .stdout(predicate::str::contains("File saved in").not());

    assert!(!dir.path().join("music").exists());
}
