// Error types for the perft tester
//
// This module defines the error taxonomy for engine invocation and fixture
// suite handling. Each error carries a stable numeric code so reports and
// logs can be filtered without parsing messages.

mod invoke;
mod suite;

pub use invoke::{log_invoke_error, InvokeError, InvokeErrorCodes};
pub use suite::{log_suite_error, SuiteError, SuiteErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so status lines, JSON reports and logs all
/// describe a failure the same way.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
