//! Fixture orchestration: one [`TestCase`] per fixture, folded by a [`SuiteRunner`].
//!
//! A fixture stops at its first structural failure. Depth 1 runs first;
//! when it fails, no deeper request is sent. Node counts are then checked in
//! file order, and the first mismatch or engine error ends the fixture. The
//! suite itself never stops early: every fixture gets a status line.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::config::RunnerSettings;
use crate::engine::PerftEngine;
use crate::error::{log_invoke_error, log_suite_error, ErrorCode, InvokeError, SuiteError};
use crate::fixtures::{FixtureDefinition, FixtureEntry};
use crate::validation::{check_moves, check_nodes, Discrepancy};

/// Writes the human-facing status lines.
///
/// Every line has the shape `<label> -- OK|KO -- <text>`.
pub struct Reporter<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn position_ok(&mut self, label: &str, startpos: &str) {
        self.line(label, "OK", format_args!("position sfen {startpos}"));
    }

    /// KO line for a failed depth-1 check, itemized only in verbose mode.
    pub fn position_ko(&mut self, label: &str, startpos: &str, discrepancies: &[Discrepancy]) {
        self.line(label, "KO", format_args!("position sfen {startpos}"));
        if self.verbose {
            for discrepancy in discrepancies {
                self.discrepancy(label, discrepancy);
            }
        }
    }

    pub fn discrepancy(&mut self, label: &str, discrepancy: &Discrepancy) {
        self.line(label, "KO", format_args!("{discrepancy}"));
    }

    pub fn failure(&mut self, label: &str, error: &dyn fmt::Display) {
        self.line(label, "KO", format_args!("{error}"));
    }

    fn line(&mut self, label: &str, status: &str, text: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{label} -- {status} -- {text}") {
            tracing::warn!("[Reporter] Failed to write status line: {}", err);
        }
    }
}

/// Verdict for one fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureOutcome {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startpos: Option<String>,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discrepancies: Vec<Discrepancy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    /// Engine processes spawned for this fixture.
    pub invocations: usize,
}

impl FixtureOutcome {
    fn new(label: &str, startpos: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            startpos: startpos.map(str::to_string),
            passed: false,
            discrepancies: Vec::new(),
            error: None,
            error_code: None,
            invocations: 0,
        }
    }

    fn with_error<E: ErrorCode>(mut self, err: &E) -> Self {
        self.error = Some(err.message());
        self.error_code = Some(err.code());
        self
    }
}

/// Drives the engine through one fixture.
pub struct TestCase<'a> {
    label: &'a str,
    fixture: &'a FixtureDefinition,
    settings: RunnerSettings,
}

impl<'a> TestCase<'a> {
    pub fn new(label: &'a str, fixture: &'a FixtureDefinition, settings: RunnerSettings) -> Self {
        Self {
            label,
            fixture,
            settings,
        }
    }

    pub fn run<E, W>(&self, engine: &mut E, reporter: &mut Reporter<W>) -> FixtureOutcome
    where
        E: PerftEngine + ?Sized,
        W: Write,
    {
        let startpos = self.fixture.startpos.as_str();
        let mut outcome = FixtureOutcome::new(self.label, Some(startpos));

        outcome.invocations += 1;
        let reply = match engine.query_moves(startpos) {
            Ok(reply) => reply,
            Err(err) => return self.abort(outcome, reporter, err),
        };

        let mut discrepancies = match check_moves(&self.fixture.moves, &reply.moves) {
            Ok(()) => Vec::new(),
            Err(diff) => diff.discrepancies,
        };
        if self.settings.strict_echo && reply.startpos != startpos {
            discrepancies.push(Discrepancy::StartposEchoMismatch {
                expected: startpos.to_string(),
                got: reply.startpos,
            });
        }

        if !discrepancies.is_empty() {
            reporter.position_ko(self.label, startpos, &discrepancies);
            tracing::info!(
                "[TestCase] {} failed depth 1 with {} discrepancies",
                self.label,
                discrepancies.len()
            );
            outcome.discrepancies = discrepancies;
            return outcome;
        }
        reporter.position_ok(self.label, startpos);

        for expectation in &self.fixture.nodes {
            outcome.invocations += 1;
            let reply = match engine.query_nodes(startpos, expectation.depth) {
                Ok(reply) => reply,
                Err(err) => return self.abort(outcome, reporter, err),
            };

            let mut found = Vec::new();
            if self.settings.strict_echo && reply.depth != expectation.depth {
                found.push(Discrepancy::DepthEchoMismatch {
                    expected: expectation.depth,
                    got: reply.depth,
                });
            }
            if let Err(discrepancy) = check_nodes(expectation.depth, expectation.nodes, reply.nodes)
            {
                found.push(discrepancy);
            }

            if !found.is_empty() {
                for discrepancy in &found {
                    reporter.discrepancy(self.label, discrepancy);
                }
                tracing::info!(
                    "[TestCase] {} failed at depth {}",
                    self.label,
                    expectation.depth
                );
                outcome.discrepancies = found;
                return outcome;
            }
        }

        outcome.passed = true;
        outcome
    }

    fn abort<W: Write>(
        &self,
        outcome: FixtureOutcome,
        reporter: &mut Reporter<W>,
        err: InvokeError,
    ) -> FixtureOutcome {
        log_invoke_error(&err, self.label);
        reporter.failure(self.label, &err);
        outcome.with_error(&err)
    }
}

/// Results of a whole suite, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub fixtures: Vec<FixtureOutcome>,
}

impl SuiteReport {
    /// True iff every fixture passed.
    pub fn passed(&self) -> bool {
        self.fixtures.iter().all(|fixture| fixture.passed)
    }

    pub fn failed_count(&self) -> usize {
        self.fixtures.iter().filter(|fixture| !fixture.passed).count()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "passed": self.passed(),
            "total": self.fixtures.len(),
            "failed": self.failed_count(),
            "fixtures": self.fixtures,
        })
    }
}

/// Runs fixtures one after another against a single engine.
pub struct SuiteRunner<'e, E: PerftEngine + ?Sized, W: Write> {
    engine: &'e mut E,
    reporter: Reporter<W>,
    settings: RunnerSettings,
}

impl<'e, E: PerftEngine + ?Sized, W: Write> SuiteRunner<'e, E, W> {
    pub fn new(engine: &'e mut E, out: W, settings: RunnerSettings) -> Self {
        Self {
            engine,
            reporter: Reporter::new(out, settings.verbose),
            settings,
        }
    }

    pub fn into_writer(self) -> W {
        self.reporter.into_inner()
    }

    /// Load and run one fixture file.
    pub fn run_entry(&mut self, entry: &FixtureEntry) -> FixtureOutcome {
        let fixture = match entry.load() {
            Ok(fixture) => fixture,
            Err(err) => return self.unloadable(entry, err),
        };
        TestCase::new(&entry.label, &fixture, self.settings).run(&mut *self.engine, &mut self.reporter)
    }

    /// Run every entry, in order, regardless of earlier failures.
    pub fn run(&mut self, entries: &[FixtureEntry]) -> SuiteReport {
        let mut report = SuiteReport::default();
        for entry in entries {
            let outcome = self.run_entry(entry);
            tracing::debug!(
                "[SuiteRunner] {} -> {}",
                entry.label,
                if outcome.passed { "passed" } else { "failed" }
            );
            report.fixtures.push(outcome);
        }
        tracing::info!(
            "[SuiteRunner] {} of {} fixtures failed",
            report.failed_count(),
            report.fixtures.len()
        );
        report
    }

    fn unloadable(&mut self, entry: &FixtureEntry, err: SuiteError) -> FixtureOutcome {
        log_suite_error(&err, &entry.label);
        self.reporter.failure(&entry.label, &err);
        FixtureOutcome::new(&entry.label, None).with_error(&err)
    }
}
