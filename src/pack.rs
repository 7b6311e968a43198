//! Packing orchestration.
//!
//! A pack run inspects the current module, installs the git override for it,
//! builds the isolated environment around the override directory, and
//! downloads `path@version` into the module cache. Each step needs the result
//! of the previous one, so the run is strictly sequential.

use crate::config::PackConfig;
use crate::download::download_module;
use crate::environment::{Environment, HostEnv};
use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::inspect::inspect_module;
use crate::module::{CachedModule, Module};
use crate::override_script::{InstalledOverride, install_git_override};
use log::{debug, info};

/// Abstraction over installing the git override.
#[cfg_attr(test, mockall::automock)]
pub trait OverrideInstaller {
    /// Installs an override resolving `module_path` to `local_dir`.
    ///
    /// # Errors
    ///
    /// Returns any error raised while locating git, identifying the user, or
    /// writing the script.
    fn install(&self, module_path: &str, local_dir: &str) -> Result<InstalledOverride>;
}

/// Installs the override for the git found on the current `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitOverrideInstaller;

impl OverrideInstaller for GitOverrideInstaller {
    fn install(&self, module_path: &str, local_dir: &str) -> Result<InstalledOverride> {
        install_git_override(module_path, local_dir)
    }
}

/// Runs the pack steps against injectable collaborators.
pub struct Packer<'a> {
    executor: &'a dyn CommandExecutor,
    installer: &'a dyn OverrideInstaller,
    host: HostEnv,
}

impl<'a> Packer<'a> {
    /// Creates a packer.
    #[must_use]
    pub fn new(
        executor: &'a dyn CommandExecutor,
        installer: &'a dyn OverrideInstaller,
        host: HostEnv,
    ) -> Self {
        Self {
            executor,
            installer,
            host,
        }
    }

    /// Caches the module in the current directory at `config.version`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by module inspection, override
    /// installation, or the download.
    pub fn run(&self, config: &PackConfig) -> Result<CachedModule> {
        let module =
            inspect_module(self.executor, &config.go_program)?.with_version(&config.version);
        self.pack(config, &module)
    }

    /// Caches `module` at its version.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by override installation or the
    /// download.
    pub fn pack(&self, config: &PackConfig, module: &Module) -> Result<CachedModule> {
        info!("packing {} from {}", module.path, module.dir);

        let installed = self.installer.install(&module.path, &module.dir)?;
        let env = Environment::isolated(
            &module.path,
            installed.dir(),
            &self.host,
            config.path_policy,
        );
        debug!("git override directory {}", installed.dir());

        let cached = download_module(
            self.executor,
            &config.go_program,
            &env,
            &module.path,
            &module.version,
        )?;
        info!("cached {cached} in {}", cached.dir);
        Ok(cached)
    }
}

#[cfg(test)]
#[path = "pack_tests.rs"]
mod tests;
