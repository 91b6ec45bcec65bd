// Perft Tester - move generator regression harness
// Drives an engine's perft command and checks replies against fixture files

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod runner;
pub mod validation;

// Re-exports for convenience
pub use config::{AliasConfig, InvokerSettings, RunnerSettings};
pub use engine::{PerftEngine, ProcessEngine};
pub use fixtures::{FixtureCatalog, FixtureDefinition, FixtureEntry};
pub use runner::{FixtureOutcome, SuiteReport, SuiteRunner, TestCase};

/// Initialize diagnostic logging on stderr.
///
/// Records from both `tracing` and `log` are rendered; repeated calls are
/// ignored so tests and binaries can call this freely.
pub fn init_logging(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
