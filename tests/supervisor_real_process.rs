// Spawns real `sh` children; unix only.
#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::time::Duration;

use commandlet_runner::RunOutcome;
use commandlet_runner::command::BuiltCommand;
use commandlet_runner::errors::RunnerError;
use commandlet_runner::exec::{Supervisor, TokioLauncher};
use commandlet_runner_test_utils::fake_launcher::RecordingSink;
use commandlet_runner_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn sh(script: &str) -> BuiltCommand {
    BuiltCommand::new("sh", ["-c", script])
}

#[tokio::test]
async fn stdout_and_stderr_are_both_captured() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("logs").join("Extract.log");
    let console = RecordingSink::new();

    let launcher = TokioLauncher;
    let outcome = Supervisor::new(&launcher)
        .echo_to(Box::new(console.clone()))
        .run(&sh("echo out-1; echo err-1 >&2; echo out-2"), &log)
        .await?;

    assert!(outcome.is_success());

    let logged: Vec<String> = fs::read_to_string(&log)?.lines().map(str::to_string).collect();
    assert_eq!(logged, vec!["out-1", "err-1", "out-2"]);
    assert_eq!(logged, console.lines());
    Ok(())
}

#[tokio::test]
async fn interleaved_stdout_and_stderr_keep_write_order() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("Interleaved.log");

    let launcher = TokioLauncher;
    Supervisor::new(&launcher)
        .echo_to(Box::new(RecordingSink::new()))
        .run(
            &sh("i=0; while [ $i -lt 200 ]; do echo out-$i; echo err-$i >&2; i=$((i+1)); done"),
            &log,
        )
        .await?;

    let logged: Vec<String> = fs::read_to_string(&log)?.lines().map(str::to_string).collect();
    let expected: Vec<String> = (0..200)
        .flat_map(|i| [format!("out-{i}"), format!("err-{i}")])
        .collect();
    assert_eq!(logged, expected);
    Ok(())
}

#[tokio::test]
async fn line_count_matches_what_the_child_printed() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("Count.log");
    let console = RecordingSink::new();

    let launcher = TokioLauncher;
    Supervisor::new(&launcher)
        .echo_to(Box::new(console.clone()))
        .run(&sh("i=0; while [ $i -lt 2000 ]; do echo line $i; i=$((i+1)); done"), &log)
        .await?;

    let logged: Vec<String> = fs::read_to_string(&log)?.lines().map(str::to_string).collect();
    let expected: Vec<String> = (0..2000).map(|i| format!("line {i}")).collect();
    assert_eq!(logged, expected);
    assert_eq!(console.lines().len(), 2000);
    Ok(())
}

#[tokio::test]
async fn exit_code_three_is_reported_as_three() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("Fail.log");

    let launcher = TokioLauncher;
    let outcome = Supervisor::new(&launcher)
        .echo_to(Box::new(RecordingSink::new()))
        .run(&sh("echo failing; exit 3"), &log)
        .await?;

    assert_eq!(
        outcome,
        RunOutcome::Failure {
            code: 3,
            log_path: log.clone()
        }
    );
    Ok(())
}

#[tokio::test]
async fn timeout_kills_the_child() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("Slow.log");

    let launcher = TokioLauncher;
    let result = Supervisor::new(&launcher)
        .echo_to(Box::new(RecordingSink::new()))
        .timeout(Some(Duration::from_secs(1)))
        .run(&sh("echo started; exec sleep 30"), &log)
        .await;

    assert!(matches!(result, Err(RunnerError::Timeout { secs: 1 })), "{result:?}");
    assert_eq!(fs::read_to_string(&log)?, "started\n");
    Ok(())
}

#[tokio::test]
async fn missing_executable_is_a_launch_error() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("Missing.log");

    let launcher = TokioLauncher;
    let result = Supervisor::new(&launcher)
        .echo_to(Box::new(RecordingSink::new()))
        .run(
            &BuiltCommand::new(dir.path().join("UE4Editor-Cmd.exe"), ["-UNATTENDED"]),
            &log,
        )
        .await;

    assert!(matches!(result, Err(RunnerError::LaunchError { .. })), "{result:?}");
    Ok(())
}
