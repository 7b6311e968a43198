//! Identifying the module in the current directory.

use crate::error::{PackError, Result};
use crate::executor::{CommandExecutor, ToolCommand, stderr_message};
use crate::module::Module;
use log::debug;
use std::path::Path;

const OPERATION: &str = "get module";

/// Returns the main module of the current directory.
///
/// Runs `go list -m -e -json` with the inherited environment. When a
/// workspace lists several main modules, the one containing the current
/// directory is returned.
///
/// # Errors
///
/// Returns [`PackError::CommandFailed`] if the go command exits
/// unsuccessfully, [`PackError::MalformedOutput`] if its output is not a
/// module description, [`PackError::ModuleReported`] if the module carries an
/// error, and [`PackError::NotInModule`] if there is no go.mod file.
pub fn inspect_module(executor: &dyn CommandExecutor, go: &str) -> Result<Module> {
    let command = ToolCommand::new(go, ["list", "-m", "-e", "-json"]);
    debug!("running {command}");

    let output = executor
        .run(&command)
        .map_err(|source| PackError::CommandSpawn {
            operation: OPERATION,
            program: command.program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(PackError::CommandFailed {
            operation: OPERATION,
            command: command.to_string(),
            status: output.status,
            stderr: stderr_message(&output),
        });
    }

    let cwd = std::env::current_dir().ok();
    let mut module = parse_module(&output.stdout, cwd.as_deref())?;
    if let Some(error) = module.error.take() {
        return Err(PackError::ModuleReported { message: error.err });
    }
    if module.go_mod.is_empty() {
        return Err(PackError::NotInModule);
    }

    debug!("main module {} in {}", module.path, module.dir);
    Ok(module)
}

/// Decodes the object stream printed by `go list -m -json` and picks the
/// module to pack.
///
/// Preference goes to the main module whose directory most closely encloses
/// `cwd`, then to the first main module, then to the first module.
fn parse_module(stdout: &[u8], cwd: Option<&Path>) -> Result<Module> {
    let modules = serde_json::Deserializer::from_slice(stdout)
        .into_iter::<Module>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|source| PackError::MalformedOutput {
            operation: OPERATION,
            source,
        })?;

    let index = enclosing_main_module(&modules, cwd)
        .or_else(|| modules.iter().position(|m| m.main))
        .unwrap_or_default();
    // Empty output decodes to an empty stream; decoding it directly yields
    // the EOF error.
    modules.into_iter().nth(index).map_or_else(
        || {
            serde_json::from_slice(stdout).map_err(|source| PackError::MalformedOutput {
                operation: OPERATION,
                source,
            })
        },
        Ok,
    )
}

fn enclosing_main_module(modules: &[Module], cwd: Option<&Path>) -> Option<usize> {
    let dir = cwd?;
    modules
        .iter()
        .enumerate()
        .filter(|(_, m)| m.main && !m.dir.is_empty() && dir.starts_with(&m.dir))
        .max_by_key(|(_, m)| Path::new(&m.dir).components().count())
        .map(|(index, _)| index)
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
