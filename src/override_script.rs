//! Generation of the `git` override script.
//!
//! cmd/go fetches a direct module by running `git` against
//! `https://<module path>`. The override is a shell script named `git`
//! that runs the real git with a `url.<base>.insteadOf` rewrite, so that the
//! module path resolves to `ssh://<user>@localhost:<module dir>`, the
//! working copy on disk. Placing the script's directory first in `PATH`
//! makes cmd/go pick it up without any change to its command line.
//!
//! Each script lives in its own private temporary directory, so that the
//! file can carry the exact name `git` and repeated runs never collide. The
//! directory is not removed when the process exits.

use crate::error::{PackError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace};
use std::fs::OpenOptions;
use std::io::Write;

/// Name of the program the override shadows.
pub const GIT_PROGRAM: &str = "git";

/// Prefix of the temporary directory holding the override.
const TEMP_DIR_PREFIX: &str = "gomod-pack";

/// Permissions of the override script (rwxr-xr-x).
#[cfg(unix)]
const SCRIPT_MODE: u32 = 0o755;

/// The validated values substituted into the override script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideSpec {
    tool_path: String,
    username: String,
    module_path: String,
    local_dir: String,
}

impl OverrideSpec {
    /// Validates the four substitution slots.
    ///
    /// Every value must be non-empty and free of control characters. The
    /// username and local directory form part of the `-c` configuration key,
    /// so they must not contain `=`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::UnsafeOverrideValue`] naming the first offending
    /// slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use gomod_pack::override_script::OverrideSpec;
    ///
    /// let spec = OverrideSpec::new("/usr/bin/git", "gopher", "example.com/foo", "/work/foo")?;
    /// assert_eq!(
    ///     spec.rewrite_argument(),
    ///     "url.ssh://gopher@localhost:/work/foo.insteadOf=https://example.com/foo"
    /// );
    ///
    /// assert!(OverrideSpec::new("/usr/bin/git", "gopher", "example.com/foo", "/a=b").is_err());
    /// # Ok::<(), gomod_pack::error::PackError>(())
    /// ```
    pub fn new(tool_path: &str, username: &str, module_path: &str, local_dir: &str) -> Result<Self> {
        validate_slot("tool path", tool_path, false)?;
        validate_slot("username", username, true)?;
        validate_slot("module path", module_path, false)?;
        validate_slot("module directory", local_dir, true)?;

        Ok(Self {
            tool_path: tool_path.to_owned(),
            username: username.to_owned(),
            module_path: module_path.to_owned(),
            local_dir: local_dir.to_owned(),
        })
    }

    /// Path of the real tool the script runs.
    #[must_use]
    pub fn tool_path(&self) -> &str {
        &self.tool_path
    }

    /// The single `-c` argument added in front of the forwarded arguments.
    #[must_use]
    pub fn rewrite_argument(&self) -> String {
        format!(
            "url.ssh://{user}@localhost:{dir}.insteadOf=https://{module}",
            user = self.username,
            dir = self.local_dir,
            module = self.module_path,
        )
    }

    /// Renders the POSIX shell script.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::UnsafeOverrideValue`] if a value cannot be
    /// shell-quoted.
    pub fn render(&self) -> Result<String> {
        let tool = quote("tool path", &self.tool_path)?;
        let rewrite = quote("rewrite rule", &self.rewrite_argument())?;
        Ok(format!("#!/bin/sh\nexec {tool} -c {rewrite} \"$@\"\n"))
    }
}

fn validate_slot(slot: &'static str, value: &str, is_config_key: bool) -> Result<()> {
    let reason = if value.is_empty() {
        Some("is empty")
    } else if value.chars().any(char::is_control) {
        Some("contains a control character")
    } else if is_config_key && value.contains('=') {
        Some("contains '='")
    } else {
        None
    };

    reason.map_or(Ok(()), |why| {
        Err(PackError::UnsafeOverrideValue {
            slot,
            value: value.to_owned(),
            reason: why,
        })
    })
}

fn quote(slot: &'static str, value: &str) -> Result<String> {
    shlex::try_quote(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| PackError::UnsafeOverrideValue {
            slot,
            value: value.to_owned(),
            reason: "cannot be shell-quoted",
        })
}

/// An override script written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledOverride {
    path: Utf8PathBuf,
}

impl InstalledOverride {
    /// Absolute path of the script.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Directory to put first in `PATH`.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        self.path.parent().unwrap_or(&self.path)
    }
}

/// Installs a `git` override redirecting `module_path` to `local_dir`.
///
/// Looks up the real git on the current `PATH` and the current user name,
/// then writes the script with [`install_override`].
///
/// # Errors
///
/// Returns [`PackError::ToolNotFound`] if git is not installed,
/// [`PackError::UserIdentity`] if the user name is unavailable, and any error
/// from [`OverrideSpec::new`] or [`install_override`].
pub fn install_git_override(module_path: &str, local_dir: &str) -> Result<InstalledOverride> {
    let found = which::which(GIT_PROGRAM).map_err(|source| PackError::ToolNotFound {
        tool: GIT_PROGRAM,
        source,
    })?;
    let git = utf8_path(found)?;
    let username =
        whoami::fallible::username().map_err(|source| PackError::UserIdentity { source })?;

    let spec = OverrideSpec::new(git.as_str(), &username, module_path, local_dir)?;
    install_override(&spec)
}

/// Writes the script for `spec` into a fresh private temporary directory.
///
/// # Errors
///
/// Returns [`PackError::OverrideFilesystem`] if the directory or file cannot
/// be created, written, synced or made executable.
pub fn install_override(spec: &OverrideSpec) -> Result<InstalledOverride> {
    let script = spec.render()?;

    let temp_dir = tempfile::Builder::new()
        .prefix(TEMP_DIR_PREFIX)
        .tempdir()
        .map_err(|source| PackError::OverrideFilesystem {
            operation: "create directory in",
            path: Utf8PathBuf::from(std::env::temp_dir().to_string_lossy().as_ref()),
            source,
        })?;
    let dir = utf8_path(temp_dir.keep())?;
    let path = dir.join(GIT_PROGRAM);

    write_script(&path, &script)?;

    debug!("installed git override at {path}");
    trace!("git override script:\n{script}");
    Ok(InstalledOverride { path })
}

fn write_script(path: &Utf8Path, script: &str) -> Result<()> {
    let fs_error = |operation: &'static str| {
        move |source: std::io::Error| PackError::OverrideFilesystem {
            operation,
            path: path.to_owned(),
            source,
        }
    };

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(SCRIPT_MODE);
    }

    let mut file = options.open(path).map_err(fs_error("create"))?;
    file.write_all(script.as_bytes()).map_err(fs_error("write"))?;

    // The creation mode is filtered through the umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(SCRIPT_MODE))
            .map_err(fs_error("set permissions on"))?;
    }

    file.sync_all().map_err(fs_error("sync"))
}

fn utf8_path(path: std::path::PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| PackError::NonUtf8Path {
        path: p.to_string_lossy().into_owned(),
    })
}
