//! # Logging
//!
//! All diagnostics go through `tracing`. [`init_telemetry`] installs a global
//! subscriber made of:
//!
//! - an [`EnvFilter`] read from `RUST_LOG` (defaults to `info`)
//! - a `fmt` layer with RFC 3339 local timestamps, rendered either pretty or as
//!   one JSON object per line depending on [`LogFormat`]
//!
//! Per-request HTTP spans come from `tower_http::trace::TraceLayer`, installed
//! by the router. Events emitted inside a handler span carry its fields.
//!
//! ## Example usage
//!
//! ```bash
//! RUST_LOG=bfhl_core=debug,tower_http=debug cargo run --bin bfhl-server
//! LOG_FORMAT=json cargo run --bin bfhl-server
//! ```

use crate::server::config::LogFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                    .with_file(true)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                    .json()
                    .with_current_span(true),
            )
            .try_init()?,
    }

    Ok(())
}
