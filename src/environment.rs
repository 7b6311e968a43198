//! Isolated environment for the `go mod download` invocation.
//!
//! The download must resolve the module straight from git, bypassing the
//! module proxy and checksum database, and must find the override `git`
//! before any installed one. Rather than mutating the process environment,
//! the variables are collected into an [`Environment`] value that the
//! executor hands to the child with a cleared inherited environment.

use camino::Utf8Path;
use std::ffi::OsString;
use std::fmt;

/// How the override directory is combined with the host search path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathPolicy {
    /// `PATH` holds the override directory and nothing else.
    #[default]
    Replace,
    /// `PATH` holds the override directory followed by the host `PATH`.
    Merge,
}

/// Snapshot of the host variables the builder may pass through.
///
/// Captured once so that [`Environment::isolated`] stays a pure function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
    /// Value of `HOME`.
    pub home: Option<String>,
    /// Value of `PATH`.
    pub path: Option<String>,
    /// Value of `GOPATH`.
    pub gopath: Option<String>,
    /// Value of `GOMODCACHE`.
    pub gomodcache: Option<String>,
    /// Value of `GOENV`.
    pub goenv: Option<String>,
    /// Value of `XDG_CONFIG_HOME`, which locates the default go env file.
    pub xdg_config_home: Option<String>,
    /// Value of `SSH_AUTH_SOCK`.
    pub ssh_auth_sock: Option<String>,
    /// Absolute path of the host `ssh`, if it could be found.
    pub ssh_program: Option<String>,
}

impl HostEnv {
    /// Reads the relevant variables from the current process.
    ///
    /// Variables that are unset or not valid Unicode are treated as absent.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            home: host_var("HOME"),
            path: host_var("PATH"),
            gopath: host_var("GOPATH"),
            gomodcache: host_var("GOMODCACHE"),
            goenv: host_var("GOENV"),
            xdg_config_home: host_var("XDG_CONFIG_HOME"),
            ssh_auth_sock: host_var("SSH_AUTH_SOCK"),
            ssh_program: which::which("ssh")
                .ok()
                .and_then(|p| p.into_os_string().into_string().ok()),
        }
    }
}

fn host_var(key: &str) -> Option<String> {
    std::env::var_os(key)
        .map(OsString::into_string)
        .and_then(Result::ok)
}

/// Ordered `KEY=value` pairs with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<(String, String)>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub const fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Builds the environment for downloading `module_path` through the git
    /// override installed in `override_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use gomod_pack::environment::{Environment, HostEnv, PathPolicy};
    ///
    /// let env = Environment::isolated(
    ///     "example.com/foo",
    ///     Utf8Path::new("/tmp/gomod-pack123"),
    ///     &HostEnv::default(),
    ///     PathPolicy::Replace,
    /// );
    /// assert_eq!(env.get("GOPRIVATE"), Some("example.com/foo"));
    /// assert_eq!(env.get("GOPROXY"), Some("direct"));
    /// assert_eq!(env.get("PATH"), Some("/tmp/gomod-pack123"));
    /// ```
    #[must_use]
    pub fn isolated(
        module_path: &str,
        override_dir: &Utf8Path,
        host: &HostEnv,
        policy: PathPolicy,
    ) -> Self {
        let mut env = Self::new();
        env.set_opt("HOME", host.home.as_deref());
        env.set_opt("GOPATH", host.gopath.as_deref());
        env.set_opt("GOMODCACHE", host.gomodcache.as_deref());
        // Settings written with `go env -w` live in the go env file.
        env.set_opt("GOENV", host.goenv.as_deref());
        env.set_opt("XDG_CONFIG_HOME", host.xdg_config_home.as_deref());
        env.set_opt("SSH_AUTH_SOCK", host.ssh_auth_sock.as_deref());
        env.set("GO111MODULE", "on");
        // Private paths skip GOPROXY and GOSUMDB lookups.
        env.set("GOPRIVATE", module_path);
        env.set("GOPROXY", "direct");
        env.set("PATH", &search_path(override_dir, host.path.as_deref(), policy));
        if policy == PathPolicy::Replace {
            // git finds ssh through PATH, which no longer holds it.
            env.set_opt("GIT_SSH", host.ssh_program.as_deref());
        }
        env
    }

    /// Sets `key` to `value`, replacing an earlier value in place.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.vars.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => value.clone_into(&mut entry.1),
            None => self.vars.push((key.to_owned(), value.to_owned())),
        }
    }

    fn set_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.set(key, v);
        }
    }

    /// Returns the value of `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the pairs rendered as `KEY=value` strings.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }

    /// Returns the number of variables.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` when no variables are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strings().join(" "))
    }
}

fn search_path(override_dir: &Utf8Path, host_path: Option<&str>, policy: PathPolicy) -> String {
    match (policy, host_path) {
        (PathPolicy::Merge, Some(rest)) if !rest.is_empty() => {
            let separator = if cfg!(windows) { ';' } else { ':' };
            format!("{override_dir}{separator}{rest}")
        }
        _ => override_dir.as_str().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn host() -> HostEnv {
        HostEnv {
            home: Some("/home/gopher".to_owned()),
            path: Some("/usr/local/bin:/usr/bin".to_owned()),
            gopath: None,
            gomodcache: Some("/home/gopher/go/pkg/mod".to_owned()),
            goenv: None,
            xdg_config_home: Some("/home/gopher/.config-alt".to_owned()),
            ssh_auth_sock: None,
            ssh_program: Some("/usr/bin/ssh".to_owned()),
        }
    }

    #[rstest]
    fn isolated_forces_direct_private_resolution(host: HostEnv) {
        let env = Environment::isolated(
            "example.com/foo",
            Utf8Path::new("/tmp/gomod-pack1"),
            &host,
            PathPolicy::Replace,
        );

        assert_eq!(env.get("GO111MODULE"), Some("on"));
        assert_eq!(env.get("GOPRIVATE"), Some("example.com/foo"));
        assert_eq!(env.get("GOPROXY"), Some("direct"));
        assert_eq!(env.get("HOME"), Some("/home/gopher"));
    }

    #[rstest]
    fn replace_policy_uses_only_override_dir(host: HostEnv) {
        let env = Environment::isolated(
            "example.com/foo",
            Utf8Path::new("/tmp/gomod-pack1"),
            &host,
            PathPolicy::Replace,
        );

        assert_eq!(env.get("PATH"), Some("/tmp/gomod-pack1"));
        assert_eq!(env.get("GIT_SSH"), Some("/usr/bin/ssh"));
    }

    #[rstest]
    fn merge_policy_puts_override_dir_first(host: HostEnv) {
        let env = Environment::isolated(
            "example.com/foo",
            Utf8Path::new("/tmp/gomod-pack1"),
            &host,
            PathPolicy::Merge,
        );

        let path = env.get("PATH").expect("PATH is always set");
        assert!(path.starts_with("/tmp/gomod-pack1"));
        assert!(path.ends_with("/usr/local/bin:/usr/bin"));
        assert_eq!(env.get("GIT_SSH"), None);
    }

    #[test]
    fn merge_policy_without_host_path_falls_back_to_override_dir() {
        let env = Environment::isolated(
            "example.com/foo",
            Utf8Path::new("/tmp/o"),
            &HostEnv::default(),
            PathPolicy::Merge,
        );
        assert_eq!(env.get("PATH"), Some("/tmp/o"));
    }

    #[rstest]
    fn unset_host_variables_are_not_passed_through(host: HostEnv) {
        let env = Environment::isolated(
            "example.com/foo",
            Utf8Path::new("/tmp/o"),
            &host,
            PathPolicy::Replace,
        );
        assert_eq!(env.get("GOPATH"), None);
        assert_eq!(env.get("SSH_AUTH_SOCK"), None);
        assert_eq!(env.get("GOMODCACHE"), Some("/home/gopher/go/pkg/mod"));
    }

    #[rstest]
    fn go_env_file_location_is_passed_through(host: HostEnv) {
        let env = Environment::isolated(
            "example.com/foo",
            Utf8Path::new("/tmp/o"),
            &host,
            PathPolicy::Replace,
        );
        assert_eq!(env.get("XDG_CONFIG_HOME"), Some("/home/gopher/.config-alt"));
        assert_eq!(env.get("GOENV"), None);

        let with_goenv = HostEnv {
            goenv: Some("/etc/go/env".to_owned()),
            ..host
        };
        let env_with_goenv = Environment::isolated(
            "example.com/foo",
            Utf8Path::new("/tmp/o"),
            &with_goenv,
            PathPolicy::Replace,
        );
        assert_eq!(env_with_goenv.get("GOENV"), Some("/etc/go/env"));
    }

    #[test]
    fn set_replaces_value_in_place() {
        let mut env = Environment::new();
        env.set("A", "1");
        env.set("B", "2");
        env.set("A", "3");

        assert_eq!(env.to_strings(), vec!["A=3".to_owned(), "B=2".to_owned()]);
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn capture_reads_host_variables() {
        temp_env::with_vars(
            [
                ("HOME", Some("/home/capture")),
                ("GOPATH", None::<&str>),
                ("GOMODCACHE", Some("/cache/mod")),
                ("XDG_CONFIG_HOME", Some("/home/capture/.cfg")),
                ("GOENV", None),
            ],
            || {
                let host = HostEnv::capture();
                assert_eq!(host.home.as_deref(), Some("/home/capture"));
                assert_eq!(host.gopath, None);
                assert_eq!(host.gomodcache.as_deref(), Some("/cache/mod"));
                assert_eq!(host.xdg_config_home.as_deref(), Some("/home/capture/.cfg"));
                assert_eq!(host.goenv, None);
            },
        );
    }
}
