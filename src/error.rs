//! Error types for gomod-pack.
//!
//! Every variant names the phase that failed so the single diagnostic line
//! printed by the binary is enough to tell where a run stopped.

use camino::Utf8PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while packing a module into the Go module cache.
#[derive(Debug, Error)]
pub enum PackError {
    /// A required executable could not be found on the search path.
    #[error("{tool} not found in PATH: {source}")]
    ToolNotFound {
        /// Name of the missing tool.
        tool: &'static str,
        /// The lookup failure.
        #[source]
        source: which::Error,
    },

    /// The name of the invoking user could not be determined.
    #[error("install git override: cannot determine current user: {source}")]
    UserIdentity {
        /// The underlying lookup failure.
        #[source]
        source: std::io::Error,
    },

    /// A value destined for the override script would escape its slot.
    #[error("install git override: unsafe {slot} {value:?}: {reason}")]
    UnsafeOverrideValue {
        /// Name of the substitution slot.
        slot: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// Creating, writing or syncing the override script failed.
    #[error("install git override: {operation} {path}: {source}")]
    OverrideFilesystem {
        /// The filesystem operation that failed.
        operation: &'static str,
        /// Path the operation was applied to.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A filesystem path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// The go command could not be started.
    #[error("{operation}: failed to run {program}: {source}")]
    CommandSpawn {
        /// The phase that tried to run the command.
        operation: &'static str,
        /// Program that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The go command exited unsuccessfully without usable output.
    #[error("{operation}: {command}: {status}: {stderr}")]
    CommandFailed {
        /// The phase that ran the command.
        operation: &'static str,
        /// The command line, for the diagnostic.
        command: String,
        /// Exit status reported by the process.
        status: ExitStatus,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The go command printed JSON that could not be decoded.
    #[error("{operation}: JSON unmarshalling: {source}")]
    MalformedOutput {
        /// The phase whose output was malformed.
        operation: &'static str,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// `go list -m` described a module with an embedded error.
    #[error("get module: {message}")]
    ModuleReported {
        /// Message from the module's `Error.Err` field.
        message: String,
    },

    /// The current directory is not inside a Go module.
    #[error("get module: not inside a module")]
    NotInModule,

    /// `go mod download` reported an error for the requested module.
    #[error("download module: {message}")]
    DownloadReported {
        /// Message from the download's `Error` field.
        message: String,
    },

    /// `go mod download` failed and printed nothing on stdout.
    #[error("download module {module:?}: {status}: {stderr}")]
    DownloadFailed {
        /// The module query that was requested.
        module: String,
        /// Exit status reported by the process.
        status: ExitStatus,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// Failed to write the result.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`PackError`].
pub type Result<T> = std::result::Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::exit_status;

    #[test]
    fn not_in_module_is_distinct_message() {
        let msg = PackError::NotInModule.to_string();
        assert_eq!(msg, "get module: not inside a module");
    }

    #[test]
    fn download_failed_includes_module_and_stderr() {
        let err = PackError::DownloadFailed {
            module: "example.com/foo@master".to_owned(),
            status: exit_status(1),
            stderr: "git: fatal".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("example.com/foo@master"));
        assert!(msg.contains("git: fatal"));
    }

    #[test]
    fn unsafe_value_names_slot() {
        let err = PackError::UnsafeOverrideValue {
            slot: "username",
            value: "a\nb".to_owned(),
            reason: "contains a control character",
        };
        let msg = err.to_string();
        assert!(msg.contains("username"));
        assert!(msg.contains("\"a\\nb\""));
    }

    #[test]
    fn override_filesystem_preserves_source() {
        let err = PackError::OverrideFilesystem {
            operation: "create",
            path: Utf8PathBuf::from("/tmp/gomod-pack/git"),
            source: std::io::Error::other("permission denied"),
        };
        assert!(err.to_string().contains("/tmp/gomod-pack/git"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
