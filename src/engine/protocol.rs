//! Wire contract with the engine under test.
//!
//! Requests are plain argument vectors; replies are one JSON object on
//! stdout whose shape depends on the requested depth.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::DepthOneForm;
use crate::error::InvokeError;

/// Longest stdout excerpt kept in a decode error.
const STDOUT_EXCERPT: usize = 256;

/// Depth-1 reply: the echoed position and every generated move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovesReply {
    pub startpos: String,
    /// `null` means no legal move.
    #[serde(deserialize_with = "null_as_empty")]
    pub moves: Vec<String>,
}

/// Depth-N reply: total leaf count for one depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesReply {
    pub depth: u32,
    pub nodes: u64,
}

/// Read a list that may be written as `null` in place of `[]`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Build the argument vector for one perft request.
pub fn request_args(
    subcommand: &str,
    startpos: &str,
    depth: u32,
    depth_one: DepthOneForm,
) -> Vec<String> {
    let mut args = vec![subcommand.to_string(), startpos.to_string()];
    if depth != 1 || depth_one == DepthOneForm::Explicit {
        args.push(depth.to_string());
    }
    args
}

/// Decode captured stdout into a typed reply.
pub fn decode_reply<T: DeserializeOwned>(stdout: &[u8]) -> Result<T, InvokeError> {
    serde_json::from_slice(stdout).map_err(|err| InvokeError::DecodeFailed {
        reason: err.to_string(),
        stdout: excerpt(stdout, STDOUT_EXCERPT),
    })
}

/// Lossy UTF-8 view of `bytes`, trimmed and cut to `limit` characters.
pub(crate) fn excerpt(bytes: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.chars().count() <= limit {
        trimmed.to_string()
    } else {
        let mut cut: String = trimmed.chars().take(limit).collect();
        cut.push_str("...");
        cut
    }
}
