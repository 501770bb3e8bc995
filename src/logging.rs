// ==========================================
// Stock Ledger - Logging setup
// ==========================================
// tracing + tracing-subscriber, level from RUST_LOG
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable selecting JSON output (`STOCK_LEDGER_LOG_FORMAT=json`)
pub const LOG_FORMAT_ENV: &str = "STOCK_LEDGER_LOG_FORMAT";

/// Initialize the global subscriber.
///
/// # Environment
/// - RUST_LOG: filter directives (default: info),
///   e.g. `RUST_LOG=stock_ledger=debug`
/// - STOCK_LEDGER_LOG_FORMAT: `json` for one JSON object per line
///
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// # Example
/// ```no_run
/// use stock_ledger::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

/// Verbose subscriber for tests
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
