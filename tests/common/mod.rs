use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Run the binary in `cwd` with `$HOME` set to `home` and preferences read
/// from `config` (which need not exist).
pub fn run_cli(stdin_json: &str, cwd: &Path, home: &Path, config: &Path) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_statusliner"))
        .current_dir(cwd)
        .env("HOME", home)
        .env("STATUSLINER_CONFIG", config)
        .env_remove("STATUSLINER_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin_json.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// A complete status line payload.
pub fn session_json() -> serde_json::Value {
    serde_json::json!({
        "hook_event_name": "Status",
        "session_id": "a1b2c3d4-e5f6-7890-abcd-ef0123456789",
        "transcript_path": "/tmp/t.jsonl",
        "cwd": "/tmp",
        "model": { "id": "claude-opus-4-1", "display_name": "Opus" },
        "workspace": { "current_dir": "/tmp", "project_dir": "/tmp" },
        "version": "1.0.80",
        "output_style": { "name": "default" }
    })
}

/// Write a preferences file into its own temp dir, so it never shows up in
/// the working tree under test.
pub fn prefs_file(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("statusliner.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

/// Preferences that make every fragment deterministic: no runtime binary,
/// no clock.
pub const DETERMINISTIC: &str = r#"
runtime_command = "statusliner-test-no-such-runtime"
time = false
"#;

/// Create a temp dir containing a git repo on `main` with an initial commit.
/// The `TempDir` must be kept alive for the duration of the test.
#[allow(dead_code)]
pub fn temp_git_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut init = git2::RepositoryInitOptions::new();
    init.initial_head("main");
    let repo = git2::Repository::init_opts(dir.path(), &init).unwrap();

    // Configure user identity for commits.
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();

    // Create an initial commit so HEAD exists.
    let sig = repo.signature().unwrap();
    let tree_oid = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();

    dir
}

#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}
