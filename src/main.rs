//! Safe multisig watcher service entry point.
//!
//! This binary watches configured Safe wallets for new, updated, executed and
//! suspicious multisig transactions and forwards classified events to the
//! configured notification channels.
//!
//! # Flow
//! 1. Loads configuration from the environment or a JSON file
//! 2. Validates chain routing for the selected API mode
//! 3. Starts the healthcheck server and the notification channels
//! 4. Spawns one watcher task per configured safe
//! 5. Handles graceful shutdown on Ctrl+C

use std::path::Path;

use clap::{Arg, Command};
use dotenvy::dotenv;
use tracing::{error, info, warn};

use safe_watcher::bootstrap::{
	initialize_notifications, start_watchers, validate_chain_support, Result,
};
use safe_watcher::models::Config;
use safe_watcher::utils::metrics::server::{create_health_server, HEALTHCHECK_PORT};
use safe_watcher::utils::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
	// Initialize command-line interface
	let matches = Command::new("safe-watcher")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Watches Safe multisig wallets for transaction activity and sends notifications \
			 to Telegram and Slack.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the JSON configuration file (default: config.json)")
				.value_name("FILE"),
		)
		.arg(
			Arg::new("check-config")
				.long("check-config")
				.help("Validate the configuration and exit")
				.action(clap::ArgAction::SetTrue),
		)
		.get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	setup_logging()?;

	let config_path = matches.get_one::<String>("config").map(Path::new);
	let config = Config::load(config_path)?;
	validate_chain_support(&config)?;

	if matches.get_flag("check-config") {
		info!("configuration is valid");
		return Ok(());
	}

	run(config).await
}

async fn run(config: Config) -> Result<()> {
	let (notifier, telegram) = initialize_notifications(&config)?;

	let health_server = create_health_server(HEALTHCHECK_PORT)?;
	let health_handle = tokio::spawn(health_server);

	let (handles, nonce_stats) = start_watchers(&config, notifier).await?;

	if let Err(e) = telegram
		.send_startup_message(&config.safe_addresses, &nonce_stats)
		.await
	{
		warn!("failed to send startup message: {}", e);
	}

	info!(
		watchers = handles.len(),
		"service started, press Ctrl+C to shutdown"
	);

	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("error waiting for Ctrl+C: {}", e);
	}
	info!("shutdown signal received, stopping watchers");

	for handle in &handles {
		handle.stop();
	}
	for handle in handles {
		handle.join().await;
	}

	health_handle.abort();

	info!("shutdown complete");
	Ok(())
}
