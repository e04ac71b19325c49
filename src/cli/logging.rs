// Logging setup
//
// Records go to stderr through env_logger. Without RUST_LOG only warnings and
// errors are emitted; `--debug` raises the level for the rest of the process.

use log::LevelFilter;

/// Install the logger; call once, before dispatching
pub fn init() {
    let mut builder = env_logger::Builder::new();
    builder
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false);

    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
            let _ = builder.try_init();
        }
        Err(_) => {
            // Let the logger pass everything and gate on the global level,
            // so that --debug only has to move the global level.
            builder.filter_level(LevelFilter::Debug);
            if builder.try_init().is_ok() {
                log::set_max_level(LevelFilter::Warn);
            }
        }
    }
}

/// Turn on debug records (`--debug`)
pub fn enable_debug() {
    if log::max_level() < LevelFilter::Debug {
        log::set_max_level(LevelFilter::Debug);
    }
}
