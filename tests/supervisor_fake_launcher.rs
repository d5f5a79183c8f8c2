use std::error::Error;
use std::fs;

use commandlet_runner::RunOutcome;
use commandlet_runner::command::CommandletInvocation;
use commandlet_runner::commandlet::Commandlet;
use commandlet_runner::config::FailurePolicy;
use commandlet_runner::errors::RunnerError;
use commandlet_runner::exec::Supervisor;
use commandlet_runner_test_utils::builders::{CommandletSettingsBuilder, ScratchProject};
use commandlet_runner_test_utils::fake_launcher::{FakeLauncher, RecordingSink};
use commandlet_runner_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn engine_lines(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("LogPackageInfo: Display: line {i}")).collect()
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn every_line_reaches_console_and_log_in_order() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    let cfg = project
        .config()
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").flag("nullrhi").build())
        .build();

    let lines = engine_lines(500);
    let launcher = FakeLauncher::new(lines.clone(), 0);
    let console = RecordingSink::new();

    let commandlet = Commandlet::new(&cfg, CommandletInvocation::new("Extract"))?;
    let outcome = commandlet
        .run_with(Supervisor::new(&launcher).echo_to(Box::new(console.clone())))
        .await?;

    assert!(matches!(outcome, RunOutcome::Success { .. }));
    assert_eq!(outcome.log_path(), commandlet.target_log_file());

    let logged = read_lines(outcome.log_path());
    assert_eq!(logged, lines);
    assert_eq!(console.lines(), lines);

    assert_eq!(launcher.launched(), vec![commandlet.command().clone()]);
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_reported_under_report_policy() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    let cfg = project
        .config()
        .on_failure(FailurePolicy::Report)
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").build())
        .build();

    let launcher = FakeLauncher::new(["Error: package not found"], 3);
    let commandlet = Commandlet::new(&cfg, CommandletInvocation::new("Extract"))?;
    let outcome = commandlet
        .run_with(Supervisor::new(&launcher).echo_to(Box::new(RecordingSink::new())))
        .await?;

    match outcome {
        RunOutcome::Failure { code, ref log_path } => {
            assert_eq!(code, 3);
            assert_eq!(read_lines(log_path), vec!["Error: package not found"]);
        }
        other => panic!("expected Failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_propagates_the_same_code_under_exit_policy() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    let cfg = project
        .config()
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").build())
        .build();

    let launcher = FakeLauncher::new(engine_lines(2), 3);
    let commandlet = Commandlet::new(&cfg, CommandletInvocation::new("Extract"))?;
    let result = commandlet
        .run_with(Supervisor::new(&launcher).echo_to(Box::new(RecordingSink::new())))
        .await;

    match result {
        Err(err @ RunnerError::ExternalProcessFailure { .. }) => assert_eq!(err.exit_code(), 3),
        other => panic!("expected ExternalProcessFailure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn second_run_overwrites_the_first_log() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    let cfg = project
        .config()
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").build())
        .build();
    let commandlet = Commandlet::new(&cfg, CommandletInvocation::new("Extract"))?;

    let first = FakeLauncher::new(["first a", "first b", "first c"], 0);
    commandlet
        .run_with(Supervisor::new(&first).echo_to(Box::new(RecordingSink::new())))
        .await?;

    let second = FakeLauncher::new(["second"], 0);
    let outcome = commandlet
        .run_with(Supervisor::new(&second).echo_to(Box::new(RecordingSink::new())))
        .await?;

    assert_eq!(read_lines(outcome.log_path()), vec!["second"]);
    Ok(())
}

#[tokio::test]
async fn missing_log_directory_is_created_and_reused() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    let cfg = project
        .config()
        .artifacts_root("Saved/Deep/Nested/Logs")
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").build())
        .build();
    let commandlet = Commandlet::new(&cfg, CommandletInvocation::new("Extract"))?;

    let log_dir = commandlet.target_log_file().parent().unwrap().to_path_buf();
    assert!(!log_dir.exists());

    for _ in 0..2 {
        let launcher = FakeLauncher::new(["ok"], 0);
        let outcome = commandlet
            .run_with(Supervisor::new(&launcher).echo_to(Box::new(RecordingSink::new())))
            .await?;
        assert!(outcome.is_success());
        assert!(log_dir.is_dir());
    }
    Ok(())
}

#[tokio::test]
async fn unwritable_log_aborts_before_launch() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    // A plain file where the artifacts directory should be.
    fs::write(project.project_root().join("Blocked"), "not a directory")?;
    let cfg = project
        .config()
        .artifacts_root("Blocked")
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").build())
        .build();

    let launcher = FakeLauncher::new(["never printed"], 0);
    let commandlet = Commandlet::new(&cfg, CommandletInvocation::new("Extract"))?;
    let result = commandlet
        .run_with(Supervisor::new(&launcher).echo_to(Box::new(RecordingSink::new())))
        .await;

    assert!(matches!(result, Err(RunnerError::IoError { .. })), "{result:?}");
    assert!(launcher.launched().is_empty(), "process must not be spawned");
    Ok(())
}

#[tokio::test]
async fn launch_failure_surfaces_as_launch_error() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    let cfg = project
        .config()
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").build())
        .build();

    let launcher = FakeLauncher::missing_binary();
    let commandlet = Commandlet::new(&cfg, CommandletInvocation::new("Extract"))?;
    let result = commandlet
        .run_with(Supervisor::new(&launcher).echo_to(Box::new(RecordingSink::new())))
        .await;

    assert!(matches!(result, Err(RunnerError::LaunchError { .. })), "{result:?}");
    Ok(())
}

#[tokio::test]
async fn distinct_log_names_can_run_concurrently() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    let cfg = project
        .config()
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").build())
        .build();

    let a = Commandlet::new(&cfg, CommandletInvocation::new("Extract").log_file_name("A.log"))?;
    let b = Commandlet::new(&cfg, CommandletInvocation::new("Extract").log_file_name("B.log"))?;
    let la = FakeLauncher::new(engine_lines(50), 0);
    let lb = FakeLauncher::new(["b only"], 0);

    let (ra, rb) = tokio::join!(
        a.run_with(Supervisor::new(&la).echo_to(Box::new(RecordingSink::new()))),
        b.run_with(Supervisor::new(&lb).echo_to(Box::new(RecordingSink::new()))),
    );

    assert_eq!(read_lines(ra?.log_path()), engine_lines(50));
    assert_eq!(read_lines(rb?.log_path()), vec!["b only"]);
    Ok(())
}

#[tokio::test]
async fn run_uses_the_configured_supervisor() -> TestResult {
    init_tracing();
    let project = ScratchProject::new();
    let cfg = project
        .config()
        .timeout_secs(30)
        .with_commandlet("Extract", CommandletSettingsBuilder::new("PkgInfo").build())
        .build();

    let launcher = FakeLauncher::new(engine_lines(3), 0);
    let commandlet = Commandlet::new(&cfg, CommandletInvocation::new("Extract"))?;
    let outcome = commandlet.run(&launcher).await?;

    assert!(outcome.is_success());
    assert_eq!(read_lines(outcome.log_path()), engine_lines(3));
    Ok(())
}
