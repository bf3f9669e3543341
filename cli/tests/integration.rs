use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

fn fc_match_font(name: &str) -> Option<String> {
    let output = Command::new("fc-match")
        .args(["--format=%{file}", name])
        .output()
        .ok()?;
    let path = String::from_utf8(output.stdout).ok()?;
    let is_sfnt = Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc" | "otc"))
        .unwrap_or(false);
    (output.status.success() && is_sfnt).then_some(path)
}

#[test]
fn resolve_echoes_absolute_paths_without_fontconfig() {
    let output = Command::new(env!("CARGO_BIN_EXE_fontload"))
        .args(["--matcher", "/nonexistent/fc-match", "resolve", "/fonts/A.ttf"])
        .output()
        .expect("run fontload");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "/fonts/A.ttf\n");
}

#[test]
fn load_of_missing_path_fails_with_context() {
    let output = Command::new(env!("CARGO_BIN_EXE_fontload"))
        .args(["load", "/dev/this-path-should-not-exist"])
        .output()
        .expect("run fontload");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("could not load non-cached font /dev/this-path-should-not-exist"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("failed to open font file"), "stderr: {stderr}");
}

#[test]
fn load_without_cache_reports_one_shot_errors() {
    let tmp = tempdir().expect("tempdir");
    let bogus = tmp.path().join("bogus.ttf");
    fs::write(&bogus, b"not really a font").expect("write fixture");

    let output = Command::new(env!("CARGO_BIN_EXE_fontload"))
        .args(["load", "--no-cache"])
        .arg(&bogus)
        .output()
        .expect("run fontload");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("could not load font") && !stderr.contains("non-cached"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("failed to parse font file"), "stderr: {stderr}");
}

#[test]
fn load_json_reports_system_sans() {
    let Some(path) = fc_match_font("sans") else {
        return; // skip without fontconfig
    };

    let output = Command::new(env!("CARGO_BIN_EXE_fontload"))
        .args(["load", "--json", "--text", "A", "sans"])
        .arg(&path)
        .output()
        .expect("run fontload");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: Value = serde_json::from_slice(&output.stdout).expect("parse json output");
    let arr = parsed.as_array().expect("load --json returns a JSON array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["name"], "sans");
    assert_eq!(arr[0]["path"], path.as_str());
    assert_eq!(arr[1]["path"], path.as_str());
    assert!(!arr[0]["faces"].as_array().expect("faces").is_empty());
    assert!(arr[0]["covers_text"].is_boolean());
}

#[cfg(unix)]
#[test]
fn stdin_names_go_through_custom_matcher() {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::process::Stdio;

    let tmp = tempdir().expect("tempdir");
    let script = tmp.path().join("matcher");
    fs::write(&script, "#!/bin/sh\nprintf '/fonts/%s.otf' \"$2\"\n").expect("write script");
    let mut perms = fs::metadata(&script).expect("stat").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod");

    let mut child = Command::new(env!("CARGO_BIN_EXE_fontload"))
        .arg("--matcher")
        .arg(&script)
        .args(["resolve", "--stdin-names", "Serif"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn fontload");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"Sans\n")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "/fonts/Sans.otf\n/fonts/Serif.otf\n"
    );
}
