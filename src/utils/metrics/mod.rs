//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines the liveness metrics exposed by the healthcheck server.

pub mod server;

use std::time::{SystemTime, UNIX_EPOCH};

use lazy_static::lazy_static;
use prometheus::{Encoder, IntGauge, Opts, Registry, TextEncoder};
use uuid::Uuid;

lazy_static! {
	// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Random per-process instance id, exposed as a metric label so restarts
	/// are distinguishable on scrape.
	pub static ref INSTANCE_ID: String = Uuid::new_v4().simple().to_string()[..8].to_string();

	// Process start, in unixtime.
	pub static ref START_TIME_SECS: i64 = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or_default();

	// Binary liveness flag.
	pub static ref SERVICE_UP: IntGauge = {
		let gauge = IntGauge::with_opts(
			Opts::new("service_up", "Simple binary flag to indicate being alive")
				.const_label("instance_id", INSTANCE_ID.as_str())
				.const_label("version", env!("CARGO_PKG_VERSION")),
		)
		.unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	// Start time gauge, in unixtime.
	pub static ref START_TIME: IntGauge = {
		let gauge = IntGauge::with_opts(
			Opts::new("start_time", "Start time, in unixtime")
				.const_label("instance_id", INSTANCE_ID.as_str())
				.const_label("version", env!("CARGO_PKG_VERSION")),
		)
		.unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Sets the liveness gauges to their running values.
pub fn initialize_metrics() {
	SERVICE_UP.set(1);
	START_TIME.set(*START_TIME_SECS);
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}
