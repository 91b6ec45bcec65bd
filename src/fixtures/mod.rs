//! Fixture discovery and loading.
//!
//! A fixture is one JSON file describing a start position, its complete
//! depth-1 move list and optional node counts for deeper plies. Fixtures
//! live together in a test directory; the catalog lists that directory or
//! looks up a single named file inside it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::protocol::null_as_empty;
use crate::error::SuiteError;

/// Expected data for one start position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureDefinition {
    /// Opaque position encoding handed to the engine verbatim.
    pub startpos: String,
    /// Every legal move from `startpos`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub moves: Vec<String>,
    /// Node counts for deeper plies, checked in file order.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub nodes: Vec<NodeExpectation>,
}

impl FixtureDefinition {
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }
}

/// Expected node count at one depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExpectation {
    pub depth: u32,
    pub nodes: u64,
}

/// A fixture file selected for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureEntry {
    /// File name, used as the label on every status line.
    pub label: String,
    pub path: PathBuf,
}

impl FixtureEntry {
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { label, path }
    }

    /// Read and parse the fixture file.
    pub fn load(&self) -> Result<FixtureDefinition, SuiteError> {
        let contents = fs::read_to_string(&self.path).map_err(|err| SuiteError::FixtureUnreadable {
            path: self.path.clone(),
            details: err.to_string(),
        })?;
        FixtureDefinition::from_json(&contents).map_err(|err| SuiteError::FixtureMalformed {
            path: self.path.clone(),
            details: err.to_string(),
        })
    }
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every regular file in the test directory, sorted by name.
    pub fn discover(&self) -> Result<Vec<FixtureEntry>, SuiteError> {
        let enumeration_error = |err: std::io::Error| SuiteError::EnumerationFailed {
            path: self.root.clone(),
            details: err.to_string(),
        };

        let mut fixtures = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(enumeration_error)? {
            let entry = entry.map_err(enumeration_error)?;
            let path = entry.path();
            if path.is_file() {
                fixtures.push(FixtureEntry::from_path(path));
            } else {
                tracing::debug!("[FixtureCatalog] Skipping non-file entry {}", path.display());
            }
        }

        fixtures.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(fixtures)
    }

    /// Look up a single fixture file inside the test directory.
    ///
    /// The file must exist and open for reading; anything else ends the run.
    pub fn entry(&self, name: &str) -> Result<FixtureEntry, SuiteError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(SuiteError::EnumerationFailed {
                path,
                details: "fixture file not found".to_string(),
            });
        }
        match fs::File::open(&path) {
            Ok(_) => Ok(FixtureEntry::from_path(path)),
            Err(err) => Err(SuiteError::EnumerationFailed {
                path,
                details: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
