// Process-wide logging setup

use tracing::Level;

/// Quiet by default; indexing chatter is opt-in.
pub const DEFAULT_LOG_LEVEL: Level = Level::WARN;

/// Initialize the global tracing subscriber, writing to stderr so the
/// host tool's stdout stays clean. Safe to call more than once; later
/// calls are no-ops.
pub fn init_logging(debug: bool, verbose: bool) {
    let level = if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        DEFAULT_LOG_LEVEL
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
