//! Logging initialization.
//!
//! Events go to stderr so that stdout stays clean for scan output. The filter
//! comes from `INJECTED_TYPES_LOG` (same syntax as `RUST_LOG`), defaulting to
//! `info`.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Env var holding the log filter directive.
pub const LOG_ENV: &str = "INJECTED_TYPES_LOG";

/// How log events are written to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, with span close events.
    Json,
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Call once, at the top of `main()`.
pub fn init(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(filter());
    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE),
            )
            .init(),
    }
}
