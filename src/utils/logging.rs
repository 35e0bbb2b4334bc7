//! Console logging for the poller and the HTTP server.
//!
//! Filtering follows `RUST_LOG`. Request traces from `tower_http` and
//! connection chatter from the HTTP client stay at `warn` unless asked for.

use std::io::{self, IsTerminal};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=warn,hyper_util=warn,reqwest=warn";

/// Builds the filter from `RUST_LOG`-style directives. Missing or
/// unparseable directives fall back to [`DEFAULT_FILTER`].
fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let stdout_layer = fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(io::stdout().is_terminal())
        .with_target(false)
        .compact();

    // Only fails if a global subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(build_filter(directives.as_deref()))
        .with(stdout_layer)
        .try_init();
}
