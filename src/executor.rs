//! Running the go command.
//!
//! The go command is the only subprocess gomod-pack starts directly. Both
//! invocations go through the [`CommandExecutor`] trait so that inspection
//! and download can be exercised against canned output.

use crate::environment::Environment;
use std::fmt;
use std::process::{Command, Output};

/// A single invocation of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program to run, either a bare name or an absolute path.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Replacement environment; `None` inherits the current one.
    pub env: Option<Environment>,
}

impl ToolCommand {
    /// Creates a command that inherits the current environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use gomod_pack::executor::ToolCommand;
    ///
    /// let cmd = ToolCommand::new("go", ["list", "-m", "-e", "-json"]);
    /// assert_eq!(cmd.to_string(), "go list -m -e -json");
    /// assert!(cmd.env.is_none());
    /// ```
    #[must_use]
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_owned(),
            args: args.into_iter().map(Into::into).collect(),
            env: None,
        }
    }

    /// Runs the command with `env` as its entire environment.
    #[must_use]
    pub fn with_env(self, env: Environment) -> Self {
        Self {
            env: Some(env),
            ..self
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs `command` to completion and returns its captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O error encountered while spawning or waiting for the
    /// process. A non-zero exit status is not an error at this level.
    fn run(&self, command: &ToolCommand) -> std::io::Result<Output>;
}

/// Executes commands on the host system.
///
/// When the command carries an [`Environment`], the inherited environment is
/// cleared first so that only the listed variables reach the child.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, command: &ToolCommand) -> std::io::Result<Output> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(env) = &command.env {
            cmd.env_clear().envs(env.iter());
        }
        cmd.output()
    }
}

/// Standard error of `output` folded onto one line, or a placeholder when it
/// is empty.
///
/// Non-blank lines are trimmed and joined with `"; "` so that the error it
/// ends up in still prints as a single diagnostic line.
pub(crate) fn stderr_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        "no error output".to_owned()
    } else {
        lines.join("; ")
    }
}
