//! Process execution for the expansion tool
//!
//! [`ToolRunner`] is the seam between argument assembly and output
//! interpretation. [`ProcessRunner`] blocks on a child process;
//! [`run_with_timeout`] is the tokio flavour used by callers that need
//! to bound how long an IRR query may take.

use crate::error::ResolveError;
use crate::output::ToolOutput;
use crate::Result;
use std::process::Stdio;
use std::time::Duration;
use tracing::debug;

/// Executes an argv (binary first) and captures its output
pub trait ToolRunner: Send + Sync {
    fn run(&self, argv: &[String]) -> Result<ToolOutput>;
}

/// Runs the tool as a blocking child process with piped stdout/stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, argv: &[String]) -> Result<ToolOutput> {
        let (binary, args) = split_argv(argv)?;
        debug!("Running {} {}", binary, args.join(" "));

        let output = std::process::Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ResolveError::Spawn {
                binary: binary.clone(),
                source,
            })?;

        Ok(ToolOutput::from(output))
    }
}

/// Run `argv` under tokio, killing the child if `timeout` expires first
///
/// A `None` timeout waits for as long as the tool takes. The child is
/// also killed if the returned future is dropped.
pub async fn run_with_timeout(argv: &[String], timeout: Option<Duration>) -> Result<ToolOutput> {
    let (binary, args) = split_argv(argv)?;
    debug!("Running {} {} (timeout {:?})", binary, args.join(" "), timeout);

    let child = tokio::process::Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ResolveError::Spawn {
            binary: binary.clone(),
            source,
        })?;

    let waited = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ResolveError::TimedOut {
                binary: binary.clone(),
                timeout: limit,
            })?,
        None => child.wait_with_output().await,
    };

    let output = waited.map_err(|source| ResolveError::Spawn {
        binary: binary.clone(),
        source,
    })?;

    Ok(ToolOutput::from(output))
}

fn split_argv(argv: &[String]) -> Result<(&String, &[String])> {
    argv.split_first().ok_or_else(|| ResolveError::Spawn {
        binary: String::new(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_empty_argv_is_spawn_error() {
        let result = ProcessRunner.run(&[]);
        assert!(matches!(result, Err(ResolveError::Spawn { .. })));
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let result = ProcessRunner.run(&argv(&["/nonexistent/bgpq3", "-j"]));
        match result {
            Err(ResolveError::Spawn { binary, .. }) => assert_eq!(binary, "/nonexistent/bgpq3"),
            other => panic!("expected spawn error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_streams() {
        let output = ProcessRunner
            .run(&argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]))
            .unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, b"out\n");
        assert_eq!(output.stderr, b"err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_with_timeout_completes() {
        let output = run_with_timeout(
            &argv(&["sh", "-c", "echo hello"]),
            Some(Duration::from_secs(30)),
        )
        .await
        .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, b"hello\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_with_timeout_expires() {
        let result = run_with_timeout(
            &argv(&["sleep", "30"]),
            Some(Duration::from_millis(100)),
        )
        .await;
        match result {
            Err(ResolveError::TimedOut { binary, timeout }) => {
                assert_eq!(binary, "sleep");
                assert_eq!(timeout, Duration::from_millis(100));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_with_timeout_missing_binary() {
        let result = run_with_timeout(&argv(&["/nonexistent/bgpq3"]), None).await;
        assert!(matches!(result, Err(ResolveError::Spawn { .. })));
    }
}
