//! Configuration for a perft run
//!
//! Two layers live here. [`AliasConfig`] is the optional YAML file that maps
//! short names to engine binaries and test directories; a missing or broken
//! file is never an error, the raw command-line values are used instead.
//! [`InvokerSettings`] and [`RunnerSettings`] are the resolved knobs handed
//! to the engine invoker and the suite runner.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default alias file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".perfttester.yml";

/// Default test directory (or alias) when none is given.
pub const DEFAULT_DIRTEST: &str = "perft";

/// Subcommand token every engine request starts with.
pub const DEFAULT_SUBCOMMAND: &str = "perfttest";

/// Default per-invocation timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// One `name -> path` alias entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPath {
    pub name: String,
    pub path: PathBuf,
}

/// Alias file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    #[serde(default)]
    pub engines: Vec<NamedPath>,
    #[serde(default)]
    pub dirtests: Vec<NamedPath>,
}

impl AliasConfig {
    /// Load aliases from a YAML file
    ///
    /// # Returns
    /// The parsed aliases, or an empty configuration when the file is
    /// missing or malformed. Both cases are logged and otherwise ignored.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded aliases from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse YAML from {:?}: {}. Using raw arguments.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "[Config] No alias file at {:?}. Using raw arguments.",
                    path.as_ref()
                );
                Self::default()
            }
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using raw arguments.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Engine path for `name`, or `name` itself when no alias matches.
    pub fn resolve_engine(&self, name: &str) -> PathBuf {
        resolve_alias(&self.engines, name)
    }

    /// Test directory for `name`, or `name` itself when no alias matches.
    pub fn resolve_dirtest(&self, name: &str) -> PathBuf {
        resolve_alias(&self.dirtests, name)
    }
}

/// First alias named `name` wins; otherwise the name is taken as a literal path.
pub fn resolve_alias(aliases: &[NamedPath], name: &str) -> PathBuf {
    aliases
        .iter()
        .find(|alias| alias.name == name)
        .map(|alias| alias.path.clone())
        .unwrap_or_else(|| PathBuf::from(name))
}

/// How depth 1 is requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthOneForm {
    /// `[subcommand, startpos, "1"]`
    #[default]
    Explicit,
    /// `[subcommand, startpos]`
    Implicit,
}

/// Engine invocation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerSettings {
    pub subcommand: String,
    /// `None` waits for the engine forever.
    pub timeout: Option<Duration>,
    pub depth_one: DepthOneForm,
}

impl InvokerSettings {
    /// Convert a millisecond count where `0` means "no timeout".
    pub fn timeout_from_millis(millis: u64) -> Option<Duration> {
        (millis > 0).then(|| Duration::from_millis(millis))
    }
}

impl Default for InvokerSettings {
    fn default() -> Self {
        Self {
            subcommand: DEFAULT_SUBCOMMAND.to_string(),
            timeout: Self::timeout_from_millis(DEFAULT_TIMEOUT_MS),
            depth_one: DepthOneForm::Explicit,
        }
    }
}

/// Suite runner settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Print itemized depth-1 discrepancies.
    pub verbose: bool,
    /// Also compare the echoed start position and depth against the request.
    pub strict_echo: bool,
}
