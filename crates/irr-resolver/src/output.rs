//! Interpretation of the expansion tool's exit status and JSON output

use crate::command::PREFIX_LIST_NAME;
use crate::error::ResolveError;
use crate::types::PrefixEntry;
use crate::Result;
use serde_json::Value;
use tracing::{error, warn};

/// Captured result of one tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code (-1 when the process was terminated by a signal)
    pub exit_code: i32,
    /// Raw stdout
    pub stdout: Vec<u8>,
    /// Raw stderr
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Whether the tool reported success
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<std::process::Output> for ToolOutput {
    fn from(output: std::process::Output) -> Self {
        ToolOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Turn a finished run of `binary` into its prefix list
pub fn interpret_output(binary: &str, output: ToolOutput) -> Result<Vec<PrefixEntry>> {
    if !output.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        warn!(
            "{} exited with code {}: {}",
            binary,
            output.exit_code,
            stderr.trim()
        );
        return Err(ResolveError::ExternalTool {
            binary: binary.to_string(),
            exit_code: output.exit_code,
            stderr,
        });
    }

    parse_prefix_list(&output.stdout)
}

/// Extract the `prefix_list` array from the tool's JSON document
pub fn parse_prefix_list(stdout: &[u8]) -> Result<Vec<PrefixEntry>> {
    let malformed = |reason: String| {
        let output = String::from_utf8_lossy(stdout).to_string();
        error!("Unusable expansion tool output ({}): {}", reason, output);
        ResolveError::MalformedOutput { reason, output }
    };

    let text = std::str::from_utf8(stdout).map_err(|e| malformed(format!("not UTF-8: {}", e)))?;
    let mut document: Value =
        serde_json::from_str(text).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let list = document
        .get_mut(PREFIX_LIST_NAME)
        .map(Value::take)
        .ok_or_else(|| malformed(format!("missing \"{}\" key", PREFIX_LIST_NAME)))?;

    serde_json::from_value(list)
        .map_err(|e| malformed(format!("\"{}\" is not a list of prefixes: {}", PREFIX_LIST_NAME, e)))
}
