//! Logger setup

use log::debug;

/// Initialize the logger with a level derived from the verbosity flags
///
/// `RUST_LOG` still applies when neither flag is given.
pub fn init_logger(verbose: bool, quiet: bool) {
    let mut builder = env_logger::Builder::from_default_env();

    if quiet {
        builder.filter_level(log::LevelFilter::Off);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Warn);
    }

    builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("logger initialized (verbose={}, quiet={})", verbose, quiet);
}
