// Engine invocation error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Invocation error code constants
///
/// Error code range: 3001-3004
pub struct InvokeErrorCodes {}

impl InvokeErrorCodes {
    /// Engine process could not be started
    pub const LAUNCH_FAILED: i32 = 3001;

    /// Engine process exited with a non-zero status or was killed
    pub const EXIT_STATUS: i32 = 3002;

    /// Engine output did not match the expected reply schema
    pub const DECODE_FAILED: i32 = 3003;

    /// Engine process did not finish within the configured timeout
    pub const TIMED_OUT: i32 = 3004;
}

/// Log an invocation error with structured context
///
/// Emits the error code, the failing component and the message so a run
/// with `--log-level error` still shows why a fixture was aborted.
pub fn log_invoke_error(err: &InvokeError, context: &str) {
    error!(
        "Invoke error in {}: code={}, component=EngineInvoker, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Engine invocation errors
///
/// None of these abort a suite: the fixture that triggered them is marked
/// failed and the runner moves on to the next one.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeError {
    /// Spawning the engine failed (missing binary, not executable, ...)
    LaunchFailed { program: PathBuf, details: String },

    /// Engine exited unsuccessfully; `code` is `None` when killed by a signal
    ExitStatus {
        program: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// Captured stdout is not a well-formed reply
    DecodeFailed { reason: String, stdout: String },

    /// Engine was killed after running longer than `limit`
    TimedOut { program: PathBuf, limit: Duration },
}

impl ErrorCode for InvokeError {
    fn code(&self) -> i32 {
        match self {
            InvokeError::LaunchFailed { .. } => InvokeErrorCodes::LAUNCH_FAILED,
            InvokeError::ExitStatus { .. } => InvokeErrorCodes::EXIT_STATUS,
            InvokeError::DecodeFailed { .. } => InvokeErrorCodes::DECODE_FAILED,
            InvokeError::TimedOut { .. } => InvokeErrorCodes::TIMED_OUT,
        }
    }

    fn message(&self) -> String {
        match self {
            InvokeError::LaunchFailed { program, details } => {
                format!("failed to launch engine {}: {}", program.display(), details)
            }
            InvokeError::ExitStatus {
                program,
                code,
                stderr,
            } => {
                let status = match code {
                    Some(code) => format!("exit status {}", code),
                    None => "termination by signal".to_string(),
                };
                if stderr.is_empty() {
                    format!("engine {} failed with {}", program.display(), status)
                } else {
                    format!(
                        "engine {} failed with {}: {}",
                        program.display(),
                        status,
                        stderr
                    )
                }
            }
            InvokeError::DecodeFailed { reason, stdout } => {
                format!("cannot decode engine reply ({}): {:?}", reason, stdout)
            }
            InvokeError::TimedOut { program, limit } => {
                format!(
                    "engine {} killed after {} ms without a reply",
                    program.display(),
                    limit.as_millis()
                )
            }
        }
    }
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message(), self.code())
    }
}

impl std::error::Error for InvokeError {}
