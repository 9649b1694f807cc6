//! Runs `AceRunner` against small shell scripts standing in for ACE.

#![cfg(unix)]

use bottlenose_core::{AceConfig, ProcessorError, ProcessorOptions, ProcessorPort};
use bottlenose_runtime::AceRunner;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CANNED: &str = r#"(:results . (((:result-id . 0) (:mrs . "[ LTOP: h0 INDEX: e2 RELS: < > HCONS: < > ]") (:derivation . "(root)")))) (:readings . 4) (:tcpu . 3)"#;

/// Write an executable script that records its arguments, stdin and
/// environment next to itself, then runs `body`.
fn fake_ace(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("ace");
    let script = format!(
        "#!/bin/sh\n\
         printf '%s\\n' \"$@\" > '{dir}/args'\n\
         cat > '{dir}/stdin'\n\
         printf '%s' \"$LANG\" > '{dir}/lang'\n\
         {body}\n",
        dir = dir.display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn runner(executable: PathBuf, timeout_secs: u64) -> AceRunner {
    AceRunner::new(AceConfig {
        executable,
        cmdargs: vec!["-r".into(), "root_strict".into()],
        timeout_secs,
        ..AceConfig::default()
    })
}

fn read(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).unwrap()
}

#[tokio::test]
async fn test_parse_round_trip_through_process() {
    let dir = TempDir::new().unwrap();
    let body = format!(
        "printf '%s\\n' '{CANNED}'\necho 'NOTE: 1 readings, added 9 / 6 edges to chart (3 fully instantiated)' >&2"
    );
    let ace = fake_ace(dir.path(), &body);

    let response = runner(ace, 10)
        .parse(
            Path::new("/g/erg.dat"),
            "Abrams barks",
            &ProcessorOptions::default().with_results(2),
        )
        .await
        .unwrap();

    assert_eq!(response.input, "Abrams barks");
    assert_eq!(response.readings, Some(4));
    assert_eq!(response.tcpu, Some(3));
    assert_eq!(response.pedges, Some(6));
    assert_eq!(response.results[0].derivation.as_deref(), Some("(root)"));

    assert_eq!(read(&dir, "stdin"), "Abrams barks\n");
    assert_eq!(read(&dir, "lang"), "en_US.UTF-8");
    let args: Vec<String> = read(&dir, "args").lines().map(str::to_string).collect();
    assert_eq!(
        args,
        [
            "-g",
            "/g/erg.dat",
            "--tsdb-stdout",
            "--report-labels",
            "-r",
            "root_strict",
            "-n",
            "2"
        ]
    );
}

#[tokio::test]
async fn test_generate_passes_flag() {
    let dir = TempDir::new().unwrap();
    let ace = fake_ace(dir.path(), "echo '(:results . nil)'");

    let response = runner(ace, 10)
        .generate(
            Path::new("/g/erg.dat"),
            "[ LTOP: h0 ]",
            &ProcessorOptions::default(),
        )
        .await
        .unwrap();

    assert!(response.results.is_empty());
    assert_eq!(read(&dir, "args").lines().last(), Some("-e"));
}

#[tokio::test]
async fn test_missing_executable() {
    let dir = TempDir::new().unwrap();
    let err = runner(dir.path().join("no-such-ace"), 10)
        .parse(Path::new("erg.dat"), "x", &ProcessorOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessorError::StartFailed(_)));
}

#[tokio::test]
async fn test_failure_without_output() {
    let dir = TempDir::new().unwrap();
    let ace = fake_ace(dir.path(), "echo 'cannot open grammar' >&2\nexit 2");
    let err = runner(ace, 10)
        .parse(Path::new("erg.dat"), "x", &ProcessorOptions::default())
        .await
        .unwrap_err();
    let ProcessorError::Failed { stderr, .. } = err else {
        panic!("expected Failed, got {err:?}");
    };
    assert_eq!(stderr, "cannot open grammar");
}

#[tokio::test]
async fn test_garbage_output_is_malformed() {
    let dir = TempDir::new().unwrap();
    let ace = fake_ace(dir.path(), "echo '(:results . ((('");
    let err = runner(ace, 10)
        .parse(Path::new("erg.dat"), "x", &ProcessorOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessorError::MalformedOutput(_)));
}

#[tokio::test]
async fn test_slow_process_times_out() {
    let dir = TempDir::new().unwrap();
    let ace = fake_ace(dir.path(), "sleep 30");
    let started = std::time::Instant::now();
    let err = runner(ace, 1)
        .parse(Path::new("erg.dat"), "x", &ProcessorOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessorError::Timeout(_)));
    assert!(started.elapsed().as_secs() < 10);
}
