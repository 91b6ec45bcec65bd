//! Comparison of engine replies against fixture expectations.
//!
//! Failures are itemized as [`Discrepancy`] values rather than collapsed
//! into a boolean, so a broken move generator shows exactly which moves it
//! dropped or invented.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// One itemized mismatch between expectation and engine reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    MoveCountMismatch {
        expected: usize,
        got: usize,
    },
    MissingMove {
        #[serde(rename = "move")]
        mv: String,
    },
    UnexpectedMove {
        #[serde(rename = "move")]
        mv: String,
    },
    NodeCountMismatch {
        depth: u32,
        expected: u64,
        got: u64,
    },
    StartposEchoMismatch {
        expected: String,
        got: String,
    },
    DepthEchoMismatch {
        expected: u32,
        got: u32,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::MoveCountMismatch { expected, got } => {
                write!(f, "moves count mismatch, expected={expected}, got={got}")
            }
            Discrepancy::MissingMove { mv } => write!(f, "missing an expected move {mv}"),
            Discrepancy::UnexpectedMove { mv } => write!(f, "got an unexpected move {mv}"),
            Discrepancy::NodeCountMismatch {
                depth,
                expected,
                got,
            } => write!(
                f,
                "nodes count mismatch at depth {depth}, expected={expected}, got={got}"
            ),
            Discrepancy::StartposEchoMismatch { expected, got } => {
                write!(f, "engine echoed position {got:?}, expected {expected:?}")
            }
            Discrepancy::DepthEchoMismatch { expected, got } => {
                write!(f, "engine echoed depth {got}, expected {expected}")
            }
        }
    }
}

/// Outcome of a failed depth-1 comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveSetDiff {
    pub discrepancies: Vec<Discrepancy>,
}

/// Compare the expected depth-1 move set with the engine's moves.
///
/// All three checks always run: count, expected moves missing from the
/// reply (fixture order), reply moves not expected (reply order).
/// Duplicates in either list are kept, so they surface through the count.
pub fn check_moves(expected: &[String], actual: &[String]) -> Result<(), MoveSetDiff> {
    let mut discrepancies = Vec::new();

    if actual.len() != expected.len() {
        discrepancies.push(Discrepancy::MoveCountMismatch {
            expected: expected.len(),
            got: actual.len(),
        });
    }

    let actual_set: HashSet<&str> = actual.iter().map(String::as_str).collect();
    for mv in expected {
        if !actual_set.contains(mv.as_str()) {
            discrepancies.push(Discrepancy::MissingMove { mv: mv.clone() });
        }
    }

    let expected_set: HashSet<&str> = expected.iter().map(String::as_str).collect();
    for mv in actual {
        if !expected_set.contains(mv.as_str()) {
            discrepancies.push(Discrepancy::UnexpectedMove { mv: mv.clone() });
        }
    }

    if discrepancies.is_empty() {
        Ok(())
    } else {
        Err(MoveSetDiff { discrepancies })
    }
}

/// Exact node-count comparison for one depth.
pub fn check_nodes(depth: u32, expected: u64, actual: u64) -> Result<(), Discrepancy> {
    if actual == expected {
        Ok(())
    } else {
        Err(Discrepancy::NodeCountMismatch {
            depth,
            expected,
            got: actual,
        })
    }
}
