//! Records decoded from the go command's JSON output.
//!
//! Field names follow `go help list` and `go help mod download`, so the
//! structs deserialise directly from the command output.

use serde::Deserialize;
use std::fmt;

/// Version used when none is requested: the tip of the primary branch.
///
/// Asking for a branch forces cmd/go to query the repository instead of
/// trusting a cached resolution.
pub const FLOATING_VERSION: &str = "master";

/// A module as described by `go list -m -json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Module {
    /// Module path.
    pub path: String,
    /// Module version.
    pub version: String,
    /// Whether this is the main module.
    pub main: bool,
    /// Directory holding files for this module, if any.
    pub dir: String,
    /// Path to the go.mod file for this module, if any.
    pub go_mod: String,
    /// Error loading the module.
    pub error: Option<ModuleError>,
}

/// The nested error object of a [`Module`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ModuleError {
    /// The error itself.
    pub err: String,
}

impl Module {
    /// Returns a copy of this module pinned to `version`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gomod_pack::module::Module;
    ///
    /// let module = Module {
    ///     path: "example.com/foo".to_owned(),
    ///     ..Module::default()
    /// };
    /// assert_eq!(module.with_version("v1.2.0").version, "v1.2.0");
    /// ```
    #[must_use]
    pub fn with_version(self, version: &str) -> Self {
        Self {
            version: version.to_owned(),
            ..self
        }
    }
}

/// A module as reported by `go mod download -json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CachedModule {
    /// Module path.
    pub path: String,
    /// Resolved module version.
    pub version: String,
    /// Error loading the module.
    pub error: String,
    /// Absolute path to the cached .info file.
    pub info: String,
    /// Absolute path to the cached .mod file.
    pub go_mod: String,
    /// Absolute path to the cached .zip file.
    pub zip: String,
    /// Absolute path to the cached source root directory.
    pub dir: String,
    /// Checksum for path, version (as in go.sum).
    pub sum: String,
    /// Checksum for go.mod (as in go.sum).
    pub go_mod_sum: String,
}

impl fmt::Display for CachedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

/// Formats the `path@version` query passed to `go mod download`.
///
/// An empty version is replaced with [`FLOATING_VERSION`].
///
/// # Examples
///
/// ```
/// use gomod_pack::module::module_query;
///
/// assert_eq!(module_query("example.com/foo", ""), "example.com/foo@master");
/// assert_eq!(module_query("example.com/foo", "v1.2.0"), "example.com/foo@v1.2.0");
/// ```
#[must_use]
pub fn module_query(path: &str, version: &str) -> String {
    let effective = if version.is_empty() {
        FLOATING_VERSION
    } else {
        version
    };
    format!("{path}@{effective}")
}
