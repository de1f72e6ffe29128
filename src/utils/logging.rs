//! Logging setup.
//!
//! Uses `tracing_subscriber` with an environment-driven filter; `log` macro
//! calls from the service modules are captured through the tracing bridge.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Installs the global subscriber, writing compact output to stdout. The
/// `RUST_LOG` environment variable overrides the default `info` level.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer().event_format(
				fmt::format()
					.with_level(true)
					.with_target(true)
					.with_thread_ids(false)
					.with_thread_names(false)
					.compact(),
			),
		)
		.try_init()?;
	Ok(())
}
