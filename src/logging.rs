//! Logging setup for the `fshash` binary
//!
//! Uses the `log` facade with the `env_logger` backend. `RUST_LOG` wins when
//! set; otherwise the level comes from the `-q`/`-v` flags. Logs go to
//! stderr so they never mix with listings on stdout.

use std::env;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize logging. Call once, before anything logs.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    builder.format_timestamp(None).format_target(false);
    // A second initialisation in the same process is harmless.
    let _ = builder.try_init();
}

/// Map CLI flags to a level: warnings by default, then info, debug, trace.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
