//! Populating the module cache with `go mod download`.
//!
//! `go mod download -json` exits with status 1 whenever a module fails to
//! download, but it still prints the module record with its `Error` field
//! set. The exit status is therefore not the failure signal: when stdout
//! carries a record, the record decides the outcome. Only a failed run that
//! printed nothing is treated as a process failure.

use crate::environment::Environment;
use crate::error::{PackError, Result};
use crate::executor::{CommandExecutor, ToolCommand, stderr_message};
use crate::module::{CachedModule, module_query};
use log::{debug, trace, warn};
use std::process::{ExitStatus, Output};

const OPERATION: &str = "download module";

/// Outcome of a `go mod download -json` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The module was downloaded into the cache.
    Success(CachedModule),
    /// The go command reported an error in the module record.
    ToolError(String),
    /// The go command failed without printing a module record.
    ProcessError {
        /// Exit status of the go command.
        status: ExitStatus,
        /// Trimmed standard error output.
        stderr: String,
    },
}

impl DownloadOutcome {
    /// Classifies the output of a `go mod download -json` run.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::MalformedOutput`] if stdout is present but is not
    /// a module record, or if a successful run printed nothing.
    pub fn classify(output: &Output) -> Result<Self> {
        if !output.status.success() && output.stdout.is_empty() {
            return Ok(Self::ProcessError {
                status: output.status,
                stderr: stderr_message(output),
            });
        }

        let cached: CachedModule =
            serde_json::from_slice(&output.stdout).map_err(|source| {
                PackError::MalformedOutput {
                    operation: OPERATION,
                    source,
                }
            })?;

        if !cached.error.is_empty() {
            return Ok(Self::ToolError(cached.error));
        }
        if !output.status.success() {
            warn!(
                "go mod download exited with {} but reported {cached} without error",
                output.status
            );
        }
        Ok(Self::Success(cached))
    }

    /// Converts the outcome into the cached module or an error.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::DownloadReported`] for a tool error and
    /// [`PackError::DownloadFailed`] for a process error.
    pub fn into_result(self, query: &str) -> Result<CachedModule> {
        match self {
            Self::Success(cached) => Ok(cached),
            Self::ToolError(message) => Err(PackError::DownloadReported { message }),
            Self::ProcessError { status, stderr } => Err(PackError::DownloadFailed {
                module: query.to_owned(),
                status,
                stderr,
            }),
        }
    }
}

/// Downloads `module_path` at `version` into the module cache.
///
/// An empty `version` downloads the tip of the primary branch. The go command
/// runs with `env` as its entire environment.
///
/// # Errors
///
/// Returns [`PackError::CommandSpawn`] if the go command cannot be started,
/// and otherwise any error produced by [`DownloadOutcome::classify`] and
/// [`DownloadOutcome::into_result`].
pub fn download_module(
    executor: &dyn CommandExecutor,
    go: &str,
    env: &Environment,
    module_path: &str,
    version: &str,
) -> Result<CachedModule> {
    let query = module_query(module_path, version);
    let command = ToolCommand::new(go, ["mod", "download", "-json", query.as_str()])
        .with_env(env.clone());
    debug!("running {command}");
    trace!("download environment: {env}");

    let output = executor
        .run(&command)
        .map_err(|source| PackError::CommandSpawn {
            operation: OPERATION,
            program: command.program.clone(),
            source,
        })?;

    DownloadOutcome::classify(&output)?.into_result(&query)
}

#[cfg(test)]
#[path = "download_tests.rs"]
mod tests;
