//! gomod-pack library.
//!
//! Pre-fills the Go module cache with the module in the current directory so
//! that other modules can require it before it is published. The module is
//! downloaded with `go mod download`, with git redirected from the module's
//! remote URL to the local working copy over SSH to localhost.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Run configuration derived from the command line
//! - [`download`] - `go mod download` invocation and outcome classification
//! - [`environment`] - Isolated environment for the download
//! - [`error`] - Error types naming the failing phase
//! - [`executor`] - Command execution abstraction
//! - [`inspect`] - Identification of the current module
//! - [`logging`] - Logger setup for the binary
//! - [`module`] - Records decoded from the go command's JSON output
//! - [`override_script`] - Generation of the `git` override script
//! - [`pack`] - Orchestration of a pack run

pub mod cli;
pub mod config;
pub mod download;
pub mod environment;
pub mod error;
pub mod executor;
pub mod inspect;
pub mod logging;
pub mod module;
pub mod override_script;
pub mod pack;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
