//! Bootstrap module for wiring the service together.
//!
//! Validates the configured chains against the selected API mode, builds the
//! notification channels, and spawns one watcher task per configured safe.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::models::{parse_prefixed_address, Config};
use crate::services::notification::{NotificationSender, SlackNotifier, TelegramNotifier};
use crate::services::safe::{supports_chain_prefix, FetchRetry, SafeApiWrapper};
use crate::services::watcher::{SafeWatcher, SafeWatcherHandle, SafeWatcherOptions};

/// Result type for bootstrap operations
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Delay between starting consecutive watchers, so their initial full
/// listings do not hit the upstream services at once.
const WATCHER_START_STAGGER: Duration = Duration::from_secs(1);

/// Checks that every configured chain prefix is routable under the selected
/// API mode. An unmapped prefix fails startup instead of surfacing mid-poll.
pub fn validate_chain_support(config: &Config) -> Result<()> {
	for addr in &config.safe_addresses {
		let (prefix, _) = parse_prefixed_address(addr)?;
		if !supports_chain_prefix(&prefix, config.api) {
			return Err(format!(
				"chain prefix '{}' is not supported in {:?} mode",
				prefix, config.api
			)
			.into());
		}
	}
	Ok(())
}

/// Builds the notification fan-out from the configured channels. The
/// Telegram channel is also returned separately for the startup message.
pub fn initialize_notifications(
	config: &Config,
) -> Result<(Arc<NotificationSender>, Arc<TelegramNotifier>)> {
	let telegram = Arc::new(TelegramNotifier::new(
		config.telegram_bot_token.clone(),
		config.telegram_channel_id.clone(),
		config.safe_url.clone(),
	)?);

	let mut sender = NotificationSender::new();
	sender.add_notifier(Box::new(telegram.clone()));

	if let Some(webhook_url) = &config.slack_webhook_url {
		let slack = SlackNotifier::new(webhook_url.clone(), config.safe_url.clone())?;
		sender.add_notifier(Box::new(slack));
		info!("slack notifications enabled");
	}

	Ok((Arc::new(sender), telegram))
}

/// Seeds and spawns one watcher per configured safe. Returns the task
/// handles and the unique-nonce counts collected from the initial listings,
/// keyed by prefixed address.
#[instrument(skip_all)]
pub async fn start_watchers(
	config: &Config,
	notifier: Arc<NotificationSender>,
) -> Result<(Vec<SafeWatcherHandle>, HashMap<String, u64>)> {
	let mut handles = Vec::with_capacity(config.safe_addresses.len());
	let mut nonce_stats = HashMap::new();

	for (i, safe) in config.safe_addresses.iter().enumerate() {
		if i > 0 {
			tokio::time::sleep(WATCHER_START_STAGGER).await;
		}

		let (prefix, address) = parse_prefixed_address(safe)?;
		let api = SafeApiWrapper::for_safe(
			&prefix,
			&address,
			config.api,
			FetchRetry::with_default_config(),
		);

		let mut watcher = SafeWatcher::new(SafeWatcherOptions {
			safe: safe.clone(),
			signers: config.signers.clone(),
			api: Arc::new(api),
			notifier: notifier.clone(),
		})?;

		let summary = watcher.start().await?;
		if let Some(count) = summary.unique_nonces {
			nonce_stats.insert(safe.clone(), count);
		}
		info!(
			safe = %safe,
			tracked = summary.tracked,
			"watcher started"
		);

		handles.push(watcher.spawn(Duration::from_secs(config.poll_interval)));
	}

	Ok((handles, nonce_stats))
}
