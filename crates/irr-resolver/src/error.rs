//! Error types for irr-resolver

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while resolving an AS-SET into prefixes
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The expansion tool could not be launched
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The expansion tool ran and exited with a non-zero status
    #[error("{}", external_tool_message(binary, *exit_code, stderr))]
    ExternalTool {
        binary: String,
        exit_code: i32,
        stderr: String,
    },

    /// The expansion tool exited cleanly but its output is unusable
    #[error("malformed output from expansion tool: {reason}")]
    MalformedOutput { reason: String, output: String },

    /// The caller-imposed deadline expired before the tool finished
    #[error("{binary} did not finish within {timeout:?}")]
    TimedOut { binary: String, timeout: Duration },
}

impl ResolveError {
    /// Exit code reported by the tool, if it ran to completion
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ResolveError::ExternalTool { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

fn external_tool_message(binary: &str, exit_code: i32, stderr: &str) -> String {
    let mut message = format!("{} exit code is {}", binary, exit_code);
    if !stderr.trim().is_empty() {
        message.push_str(", stderr: ");
        message.push_str(stderr);
    }
    message
}

/// Errors that can occur while loading resolver configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
