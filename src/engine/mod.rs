//! Engine invoker: runs the engine under test as a child process.
//!
//! Every request spawns a fresh process, captures stdout and stderr to the
//! end, waits for exit and decodes stdout as JSON. The child is owned by the
//! future that awaits it and is spawned with `kill_on_drop`, so a timeout
//! (or any other early return) kills the process and closes its pipes.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use tokio::runtime::{Builder, Runtime};

use crate::config::InvokerSettings;
use crate::error::InvokeError;

pub mod protocol;

pub use protocol::{MovesReply, NodesReply};

/// Longest stderr excerpt carried in an exit-status error.
const STDERR_EXCERPT: usize = 512;

/// Seam between fixture orchestration and the engine.
///
/// [`ProcessEngine`] is the real implementation; tests substitute scripted
/// engines to observe which requests a fixture issues.
pub trait PerftEngine {
    /// Depth-1 request: the full move list from `startpos`.
    fn query_moves(&mut self, startpos: &str) -> Result<MovesReply, InvokeError>;

    /// Depth-N request: the node count `depth` plies below `startpos`.
    fn query_nodes(&mut self, startpos: &str, depth: u32) -> Result<NodesReply, InvokeError>;
}

/// Engine reached by spawning an executable once per request.
pub struct ProcessEngine {
    program: PathBuf,
    settings: InvokerSettings,
    runtime: Runtime,
}

impl ProcessEngine {
    /// Create an invoker for `program`.
    ///
    /// Only the single-threaded runtime used to supervise children can fail
    /// here; the program itself is not checked until the first request.
    pub fn new<P: Into<PathBuf>>(program: P, settings: InvokerSettings) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            program: program.into(),
            settings,
            runtime,
        })
    }

    /// Run one perft request and return the raw stdout of a successful exit.
    pub fn invoke(&self, startpos: &str, depth: u32) -> Result<Vec<u8>, InvokeError> {
        let args = protocol::request_args(
            &self.settings.subcommand,
            startpos,
            depth,
            self.settings.depth_one,
        );
        tracing::debug!(
            "[EngineInvoker] Spawning {} {:?}",
            self.program.display(),
            args
        );
        let started = Instant::now();
        let stdout = self.runtime.block_on(self.run_child(&args))?;
        tracing::debug!(
            "[EngineInvoker] Depth {} answered with {} bytes in {:?}",
            depth,
            stdout.len(),
            started.elapsed()
        );
        Ok(stdout)
    }

    async fn run_child(&self, args: &[String]) -> Result<Vec<u8>, InvokeError> {
        let child = tokio::process::Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| InvokeError::LaunchFailed {
                program: self.program.clone(),
                details: err.to_string(),
            })?;

        let waited = match self.settings.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_) => {
                    tracing::warn!(
                        "[EngineInvoker] {} exceeded {:?}, killing it",
                        self.program.display(),
                        limit
                    );
                    return Err(InvokeError::TimedOut {
                        program: self.program.clone(),
                        limit,
                    });
                }
            },
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|err| InvokeError::LaunchFailed {
            program: self.program.clone(),
            details: err.to_string(),
        })?;

        if !output.status.success() {
            return Err(InvokeError::ExitStatus {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: protocol::excerpt(&output.stderr, STDERR_EXCERPT),
            });
        }

        if !output.stderr.is_empty() {
            tracing::debug!(
                "[EngineInvoker] stderr: {}",
                protocol::excerpt(&output.stderr, STDERR_EXCERPT)
            );
        }

        Ok(output.stdout)
    }
}

impl PerftEngine for ProcessEngine {
    fn query_moves(&mut self, startpos: &str) -> Result<MovesReply, InvokeError> {
        let stdout = self.invoke(startpos, 1)?;
        protocol::decode_reply(&stdout)
    }

    fn query_nodes(&mut self, startpos: &str, depth: u32) -> Result<NodesReply, InvokeError> {
        let stdout = self.invoke(startpos, depth)?;
        protocol::decode_reply(&stdout)
    }
}

#[cfg(all(test, unix))]
mod tests;
