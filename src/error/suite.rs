// Fixture suite error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;
use std::path::PathBuf;

/// Suite error code constants
///
/// Error code range: 4001-4003
pub struct SuiteErrorCodes {}

impl SuiteErrorCodes {
    /// Test directory cannot be listed or a named fixture is missing
    pub const ENUMERATION_FAILED: i32 = 4001;

    /// Fixture file exists but cannot be read
    pub const FIXTURE_UNREADABLE: i32 = 4002;

    /// Fixture file content is not a valid fixture definition
    pub const FIXTURE_MALFORMED: i32 = 4003;
}

/// Log a suite error with structured context
pub fn log_suite_error(err: &SuiteError, context: &str) {
    error!(
        "Suite error in {}: code={}, component=FixtureCatalog, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Fixture enumeration and loading errors
///
/// `EnumerationFailed` ends the whole run; the other two only fail the
/// fixture they belong to.
#[derive(Debug, Clone, PartialEq)]
pub enum SuiteError {
    /// Directory listing or single-fixture lookup failed
    EnumerationFailed { path: PathBuf, details: String },

    /// Reading the fixture file failed
    FixtureUnreadable { path: PathBuf, details: String },

    /// Fixture JSON is malformed or misses `startpos`
    FixtureMalformed { path: PathBuf, details: String },
}

impl SuiteError {
    /// Whether this error should stop the run instead of a single fixture.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SuiteError::EnumerationFailed { .. })
    }
}

impl ErrorCode for SuiteError {
    fn code(&self) -> i32 {
        match self {
            SuiteError::EnumerationFailed { .. } => SuiteErrorCodes::ENUMERATION_FAILED,
            SuiteError::FixtureUnreadable { .. } => SuiteErrorCodes::FIXTURE_UNREADABLE,
            SuiteError::FixtureMalformed { .. } => SuiteErrorCodes::FIXTURE_MALFORMED,
        }
    }

    fn message(&self) -> String {
        match self {
            SuiteError::EnumerationFailed { path, details } => {
                format!("cannot enumerate tests at {}: {}", path.display(), details)
            }
            SuiteError::FixtureUnreadable { path, details } => {
                format!("cannot read fixture {}: {}", path.display(), details)
            }
            SuiteError::FixtureMalformed { path, details } => {
                format!("malformed fixture {}: {}", path.display(), details)
            }
        }
    }
}

impl fmt::Display for SuiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message(), self.code())
    }
}

impl std::error::Error for SuiteError {}
