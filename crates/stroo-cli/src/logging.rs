// Logging setup

use tracing::Level;

/// Level named in configuration; unknown names fall back to INFO
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Effective level: `--debug` forces DEBUG unless TRACE was asked for
pub fn effective_level(configured: &str, debug: bool) -> Level {
    let level = parse_level(configured);
    if debug && level < Level::DEBUG {
        Level::DEBUG
    } else {
        level
    }
}

/// Install the global subscriber, writing to stderr
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_logging(configured: &str, debug: bool) {
    let level = effective_level(configured, debug);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
