//! Run configuration derived from the command line.

use crate::cli::Cli;
use crate::environment::PathPolicy;
use crate::error::{PackError, Result};
use std::path::PathBuf;

/// Settings consumed by [`crate::pack::Packer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Version to download; empty selects the floating default.
    pub version: String,
    /// How the override directory joins the search path.
    pub path_policy: PathPolicy,
    /// Absolute path of the go command.
    pub go_program: String,
}

impl PackConfig {
    /// Builds the configuration for `cli`.
    ///
    /// The go command is resolved against the current `PATH` here, because
    /// the download runs with a `PATH` that no longer contains it.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::ToolNotFound`] if the go command cannot be found
    /// and [`PackError::NonUtf8Path`] if its path is not UTF-8.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let found = which::which(&cli.go)
            .map_err(|source| PackError::ToolNotFound { tool: "go", source })?;

        Ok(Self {
            version: cli.version.clone(),
            path_policy: if cli.inherit_path {
                PathPolicy::Merge
            } else {
                PathPolicy::Replace
            },
            go_program: path_string(found)?,
        })
    }
}

fn path_string(path: PathBuf) -> Result<String> {
    path.into_os_string()
        .into_string()
        .map_err(|raw| PackError::NonUtf8Path {
            path: raw.to_string_lossy().into_owned(),
        })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn from_cli_resolves_program_and_policy() {
        let cli = Cli {
            version: "v1.2.0".to_owned(),
            inherit_path: true,
            go: "/bin/sh".to_owned(),
            ..Cli::default()
        };

        let config = PackConfig::from_cli(&cli).expect("/bin/sh should resolve");

        assert_eq!(config.version, "v1.2.0");
        assert_eq!(config.path_policy, PathPolicy::Merge);
        assert_eq!(config.go_program, "/bin/sh");
    }

    #[test]
    fn from_cli_defaults_to_replace_policy() {
        let cli = Cli {
            go: "/bin/sh".to_owned(),
            ..Cli::default()
        };

        let config = PackConfig::from_cli(&cli).expect("/bin/sh should resolve");

        assert_eq!(config.path_policy, PathPolicy::Replace);
        assert_eq!(config.version, "master");
    }

    #[test]
    fn from_cli_reports_missing_go() {
        let cli = Cli {
            go: "/nonexistent/gomod-pack-test/go".to_owned(),
            ..Cli::default()
        };

        let err = PackConfig::from_cli(&cli).expect_err("missing program should fail");

        assert!(
            matches!(err, PackError::ToolNotFound { tool: "go", .. }),
            "got {err:?}"
        );
    }
}
