//! Shared test support for the integration suites.
//!
//! Provides canned `go mod download -json` records, an override installer
//! that does not depend on the host git or user database, and (on Unix) a
//! fake git that records the arguments it receives.

#![expect(dead_code, reason = "each test crate uses a different subset")]

use gomod_pack::error::Result;
use gomod_pack::override_script::{InstalledOverride, OverrideSpec, install_override};
use gomod_pack::pack::OverrideInstaller;

/// A successful download record.
pub const CACHED_JSON: &str = r#"{
    "Path": "example.com/foo",
    "Version": "v0.0.0-20201010101010-abcdefabcdef",
    "Info": "/go/pkg/mod/cache/download/example.com/foo/@v/v0.0.0-20201010101010-abcdefabcdef.info",
    "GoMod": "/go/pkg/mod/cache/download/example.com/foo/@v/v0.0.0-20201010101010-abcdefabcdef.mod",
    "Zip": "/go/pkg/mod/cache/download/example.com/foo/@v/v0.0.0-20201010101010-abcdefabcdef.zip",
    "Dir": "/go/pkg/mod/example.com/foo@v0.0.0-20201010101010-abcdefabcdef",
    "Sum": "h1:abc=",
    "GoModSum": "h1:def="
}"#;

/// A download record carrying an error.
pub const REPORTED_JSON: &str = r#"{
    "Path": "example.com/foo",
    "Version": "master",
    "Error": "example.com/foo@master: invalid version: unknown revision master"
}"#;

/// Writes overrides for a fixed git path and user name.
pub struct FixedInstaller;

impl OverrideInstaller for FixedInstaller {
    fn install(&self, module_path: &str, local_dir: &str) -> Result<InstalledOverride> {
        let spec = OverrideSpec::new("/usr/bin/git", "gopher", module_path, local_dir)?;
        install_override(&spec)
    }
}

/// Writes an executable fake git into `dir` that prints each argument on its
/// own line to the file named by `$RECORD`.
#[cfg(unix)]
pub fn write_recording_tool(dir: &std::path::Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("real-git");
    std::fs::write(&path, "#!/bin/sh\nprintf '%s\\n' \"$@\" > \"$RECORD\"\n")
        .expect("write recording tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make recording tool executable");
    path
}
