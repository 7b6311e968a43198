//! Shared test utilities for gomod-pack.

use crate::executor::{CommandExecutor, ToolCommand};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code.unsigned_abs())
}

/// Creates a command `Output` with the given exit code, stdout and stderr.
#[must_use]
pub fn output(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Creates a successful command `Output` printing `stdout`.
#[must_use]
pub fn success_output(stdout: &str) -> Output {
    output(0, stdout, "")
}

/// Creates a failed command `Output` with empty stdout and the given stderr.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    output(1, "", stderr)
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The arguments the command must be invoked with; `None` accepts any.
    pub args: Option<Vec<String>>,
    /// The result to return when this command is invoked.
    pub result: std::io::Result<Output>,
}

impl ExpectedCall {
    /// Expects `args` and answers with `output`.
    #[must_use]
    pub fn new(args: &[&str], output: Output) -> Self {
        Self {
            args: Some(args.iter().map(|arg| (*arg).to_owned()).collect()),
            result: Ok(output),
        }
    }

    /// Accepts any arguments and answers with `output`.
    #[must_use]
    pub fn any(output: Output) -> Self {
        Self {
            args: None,
            result: Ok(output),
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Checks each invocation against the next expected call, returns its
/// predefined result, and records the command so tests can inspect the
/// environment it carried.
#[derive(Debug, Default)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    received: RefCell<Vec<ToolCommand>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            received: RefCell::new(Vec::new()),
        }
    }

    /// Returns the commands received so far.
    #[must_use]
    pub fn received(&self) -> Vec<ToolCommand> {
        self.received.borrow().clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, command: &ToolCommand) -> std::io::Result<Output> {
        self.received.borrow_mut().push(command.clone());
        let call = self
            .expected
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command invocation: {command}"));

        if let Some(args) = &call.args {
            assert_eq!(args, &command.args, "unexpected arguments for {command}");
        }

        call.result
    }
}
