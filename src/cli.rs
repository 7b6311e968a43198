//! CLI argument definitions for gomod-pack.
//!
//! Kept separate from the entrypoint so that the binary stays focused on
//! orchestration and the flags can be tested without spawning a process.

use crate::module::FLOATING_VERSION;
use clap::Parser;

/// Pre-fill the Go module cache with the module in the current directory.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "gomod-pack")]
#[command(about)]
#[command(long_about = concat!(
    "Pre-fill the Go module cache with the module in the current directory.\n\n",
    "gomod-pack runs `go mod download` with git configured to resolve the ",
    "remote module path to the local module root over SSH to localhost, and ",
    "with cmd/go configured to use a direct connection with the checksum ",
    "database disabled. It prints the versioned module path so that it can be ",
    "used in a go.mod require directive.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Cache the tip of the master branch:\n",
    "    $ gomod-pack\n\n",
    "  Cache a tagged version:\n",
    "    $ gomod-pack --version v1.2.0\n",
))]
pub struct Cli {
    /// Module version to cache.
    #[arg(long = "version", value_name = "VERSION", default_value = FLOATING_VERSION)]
    pub version: String,

    /// Append the inherited PATH after the git override directory.
    #[arg(long)]
    pub inherit_path: bool,

    /// The go command to run.
    #[arg(long, value_name = "PROGRAM", default_value = "go")]
    pub go: String,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Default for Cli {
    /// Creates a `Cli` matching an invocation without arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use gomod_pack::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert_eq!(cli.version, "master");
    /// assert_eq!(cli.go, "go");
    /// ```
    fn default() -> Self {
        Self {
            version: FLOATING_VERSION.to_owned(),
            inherit_path: false,
            go: "go".to_owned(),
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
