use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::*;
use crate::config::DepthOneForm;

// Writing an executable while another test thread forks can leave the file
// busy (ETXTBSY), so tests that create scripts run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_engine(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("engine.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn settings(timeout: Option<Duration>, depth_one: DepthOneForm) -> InvokerSettings {
    InvokerSettings {
        subcommand: "perfttest".into(),
        timeout,
        depth_one,
    }
}

#[test]
fn depth_one_request_passes_position_verbatim() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    // moves carry the subcommand and the argument count back to the test
    let program = write_engine(
        dir.path(),
        r#"printf '{"startpos":"%s","moves":["%s","%s"]}' "$2" "$1" "$#""#,
    );
    let mut engine =
        ProcessEngine::new(program, settings(None, DepthOneForm::Explicit)).unwrap();

    let reply = engine.query_moves("lnsgkgsnl/9 b - 1").unwrap();
    assert_eq!(reply.startpos, "lnsgkgsnl/9 b - 1");
    assert_eq!(reply.moves, vec!["perfttest", "3"]);
}

#[test]
fn implicit_depth_one_sends_two_arguments() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let program = write_engine(
        dir.path(),
        r#"printf '{"startpos":"%s","moves":["%s"]}' "$2" "$#""#,
    );
    let mut engine =
        ProcessEngine::new(program, settings(None, DepthOneForm::Implicit)).unwrap();

    let reply = engine.query_moves("startA").unwrap();
    assert_eq!(reply.moves, vec!["2"]);
}

#[test]
fn nodes_request_reports_requested_depth() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let program = write_engine(dir.path(), r#"printf '{"depth":%s,"nodes":400}' "$3""#);
    let mut engine =
        ProcessEngine::new(program, settings(None, DepthOneForm::Explicit)).unwrap();

    let reply = engine.query_nodes("startA", 3).unwrap();
    assert_eq!(reply, NodesReply { depth: 3, nodes: 400 });
}

#[test]
fn missing_binary_is_a_launch_error() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let mut engine = ProcessEngine::new(
        dir.path().join("no-such-engine"),
        settings(None, DepthOneForm::Explicit),
    )
    .unwrap();

    let err = engine.query_moves("startA").unwrap_err();
    assert!(
        matches!(err, InvokeError::LaunchFailed { .. }),
        "unexpected error {err:?}"
    );
}

#[test]
fn non_zero_exit_carries_stderr() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let program = write_engine(dir.path(), "echo 'unknown position' >&2\nexit 3");
    let mut engine =
        ProcessEngine::new(program, settings(None, DepthOneForm::Explicit)).unwrap();

    match engine.query_nodes("startA", 2).unwrap_err() {
        InvokeError::ExitStatus { code, stderr, .. } => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "unknown position");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unparsable_stdout_is_a_decode_error() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let program = write_engine(dir.path(), "echo 'perft 1: 30 moves'");
    let mut engine =
        ProcessEngine::new(program, settings(None, DepthOneForm::Explicit)).unwrap();

    match engine.query_moves("startA").unwrap_err() {
        InvokeError::DecodeFailed { stdout, .. } => assert_eq!(stdout, "perft 1: 30 moves"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn hung_engine_is_killed_after_timeout() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let program = write_engine(dir.path(), "exec sleep 30");
    let mut engine = ProcessEngine::new(
        program,
        settings(Some(Duration::from_millis(200)), DepthOneForm::Explicit),
    )
    .unwrap();

    let started = Instant::now();
    let err = engine.query_nodes("startA", 5).unwrap_err();
    assert!(
        matches!(err, InvokeError::TimedOut { limit, .. } if limit == Duration::from_millis(200)),
        "unexpected error {err:?}"
    );
    assert!(started.elapsed() < Duration::from_secs(10));
}
