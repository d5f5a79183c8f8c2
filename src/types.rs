use std::path::{Path, PathBuf};

/// Result of one supervised commandlet run.
///
/// - `Success`: the child exited with code 0.
/// - `Failure`: the child exited non-zero. A child terminated by a signal
///   has no exit code and is reported as `-1`.
///
/// Both variants carry the path of the persisted raw log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success { log_path: PathBuf },
    Failure { code: i32, log_path: PathBuf },
}

impl RunOutcome {
    pub fn from_exit_code(code: i32, log_path: PathBuf) -> Self {
        if code == 0 {
            RunOutcome::Success { log_path }
        } else {
            RunOutcome::Failure { code, log_path }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success { .. })
    }

    /// The child's exit code (0 for success).
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Success { .. } => 0,
            RunOutcome::Failure { code, .. } => *code,
        }
    }

    pub fn log_path(&self) -> &Path {
        match self {
            RunOutcome::Success { log_path } | RunOutcome::Failure { log_path, .. } => log_path,
        }
    }
}
