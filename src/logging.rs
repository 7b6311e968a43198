//! Logger setup for the binary.
//!
//! The library logs through the `log` facade; the binary installs
//! `env_logger` writing to stderr, so stdout only ever carries the result.

use log::LevelFilter;

/// Maps the `-v`/`-q` flags to a level filter.
///
/// # Examples
///
/// ```
/// use gomod_pack::logging::level_filter;
/// use log::LevelFilter;
///
/// assert_eq!(level_filter(0, false), LevelFilter::Warn);
/// assert_eq!(level_filter(2, false), LevelFilter::Debug);
/// assert_eq!(level_filter(0, true), LevelFilter::Error);
/// ```
#[must_use]
pub const fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the stderr logger at `level`; `RUST_LOG` takes precedence.
pub fn init(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false);

    if builder.try_init().is_err() {
        // A logger is already installed; keep it.
    }
}
