//! gomod-pack CLI entrypoint.
//!
//! Caches the module in the current directory and prints the versioned module
//! path, so that it can be used in a go.mod require directive.

use clap::Parser;
use gomod_pack::cli::Cli;
use gomod_pack::config::PackConfig;
use gomod_pack::environment::HostEnv;
use gomod_pack::error::{PackError, Result};
use gomod_pack::executor::SystemCommandExecutor;
use gomod_pack::logging;
use gomod_pack::pack::{GitOverrideInstaller, Packer};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    logging::init(logging::level_filter(cli.verbosity, cli.quiet));

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let config = PackConfig::from_cli(cli)?;
    let packer = Packer::new(
        &SystemCommandExecutor,
        &GitOverrideInstaller,
        HostEnv::capture(),
    );
    let cached = packer.run(&config)?;

    writeln!(stdout, "{cached}").map_err(|source| PackError::WriteFailed { source })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "gomod-pack: {message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
