//! Healthcheck server module
//!
//! This module provides an HTTP server exposing liveness and Prometheus
//! metrics endpoints for scraping.

use std::time::Instant;

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde_json::json;
use tracing::{error, info};

use crate::utils::metrics::{gather_metrics, initialize_metrics};

/// Default port of the healthcheck server.
pub const HEALTHCHECK_PORT: u16 = 4000;

/// Renders a duration in whole seconds as human-readable component words,
/// largest unit first. Zero-valued units are omitted.
pub fn format_uptime(total_secs: u64) -> String {
	const UNITS: [(&str, u64); 4] = [
		("day", 86_400),
		("hour", 3_600),
		("minute", 60),
		("second", 1),
	];

	let mut remaining = total_secs;
	let mut parts = Vec::new();
	for (name, secs) in UNITS {
		let value = remaining / secs;
		remaining %= secs;
		if value > 0 {
			let plural = if value == 1 { "" } else { "s" };
			parts.push(format!("{} {}{}", value, name, plural));
		}
	}

	if parts.is_empty() {
		"0 seconds".to_string()
	} else {
		parts.join(" ")
	}
}

/// Uptime endpoint handler
async fn uptime_handler(started: web::Data<Instant>) -> impl Responder {
	HttpResponse::Ok().json(json!({
		"uptime": format_uptime(started.elapsed().as_secs()),
	}))
}

/// Metrics endpoint handler
async fn metrics_handler() -> impl Responder {
	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok().content_type("text/plain").body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().body("error")
		}
	}
}

/// Create the healthcheck server bound to every interface on the given port.
pub fn create_health_server(port: u16) -> std::io::Result<actix_web::dev::Server> {
	initialize_metrics();
	let started = web::Data::new(Instant::now());

	info!("starting healthcheck server on port {}", port);

	Ok(HttpServer::new(move || {
		App::new()
			.app_data(started.clone())
			.route("/", web::get().to(uptime_handler))
			.route("/metrics", web::get().to(metrics_handler))
	})
	.workers(1)
	.bind(("0.0.0.0", port))?
	.shutdown_timeout(5)
	.run())
}
