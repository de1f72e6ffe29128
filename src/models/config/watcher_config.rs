//! Service configuration loading and validation.
//!
//! Configuration comes from the environment when the required variables are
//! present, falling back to a JSON file (`config.json` by default). The
//! validated record carries the watched wallets, polling interval, API mode
//! and notification channel credentials.

use std::{collections::HashMap, env, path::Path};

use log::{info, warn};
use serde::Deserialize;

use super::error::ConfigError;
use crate::models::core::parse_prefixed_address;

/// Which upstream API the source wrapper should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
	/// Always the Safe Transaction Service
	Classic,
	/// Always the Safe Client Gateway
	Alt,
	/// Try the Transaction Service first, fall back to the Gateway per call
	#[default]
	Fallback,
}

impl ApiMode {
	fn parse(value: &str) -> Option<Self> {
		match value {
			"classic" => Some(Self::Classic),
			"alt" => Some(Self::Alt),
			"fallback" => Some(Self::Fallback),
			_ => None,
		}
	}
}

fn default_safe_url() -> String {
	"https://app.safe.global".to_string()
}

fn default_poll_interval() -> u64 {
	20
}

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
	/// Base URL of the Safe web app, used for links in notifications
	#[serde(rename = "safeURL", default = "default_safe_url")]
	pub safe_url: String,
	/// Polling interval in seconds
	#[serde(default = "default_poll_interval")]
	pub poll_interval: u64,
	pub telegram_bot_token: String,
	pub telegram_channel_id: String,
	#[serde(default)]
	pub slack_webhook_url: Option<String>,
	/// Prefixed safe addresses to watch, e.g. `eth:0x1111...`
	pub safe_addresses: Vec<String>,
	/// Signer address to human-readable name, used only for presentation
	#[serde(default)]
	pub signers: HashMap<String, String>,
	#[serde(default)]
	pub api: ApiMode,
}

impl Config {
	/// Loads the configuration, preferring environment variables over the
	/// JSON file at `path` (or `config.json` when no path is given).
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		if let Some(config) = Self::from_env()? {
			info!("loaded configuration from environment");
			return Ok(config);
		}
		let path = path.unwrap_or(Path::new("config.json"));
		let config = Self::load_from_path(path)?;
		info!("loaded configuration from {}", path.display());
		Ok(config)
	}

	/// Loads and validates the configuration from a JSON file.
	pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !path.exists() {
			return Err(ConfigError::file_error(format!(
				"config file {} not found",
				path.display()
			)));
		}
		let file = std::fs::File::open(path)?;
		let config: Config = serde_json::from_reader(file)?;
		config.validate()?;
		Ok(config)
	}

	/// Builds the configuration from environment variables. Returns `None`
	/// when any of the required variables is missing.
	fn from_env() -> Result<Option<Self>, ConfigError> {
		let (Ok(telegram_bot_token), Ok(telegram_channel_id), Ok(addresses)) = (
			env::var("TELEGRAM_BOT_TOKEN"),
			env::var("TELEGRAM_CHANNEL_ID"),
			env::var("SAFE_ADDRESSES"),
		) else {
			return Ok(None);
		};

		let safe_addresses: Vec<String> = addresses
			.split(',')
			.map(|addr| addr.trim().to_string())
			.filter(|addr| !addr.is_empty())
			.collect();

		let mut signers = HashMap::new();
		if let Ok(pairs) = env::var("SIGNERS") {
			for pair in pairs.split(',') {
				if let Some((address, name)) = pair.split_once(':') {
					let (address, name) = (address.trim(), name.trim());
					if !address.is_empty() && !name.is_empty() {
						signers.insert(address.to_string(), name.to_string());
					}
				}
			}
		}

		let mut config = Config {
			safe_url: env::var("SAFE_URL").unwrap_or_else(|_| default_safe_url()),
			poll_interval: default_poll_interval(),
			telegram_bot_token,
			telegram_channel_id,
			slack_webhook_url: env::var("SLACK_WEBHOOK_URL").ok(),
			safe_addresses,
			signers,
			api: ApiMode::default(),
		};

		if let Ok(value) = env::var("POLL_INTERVAL") {
			match value.parse::<u64>() {
				Ok(interval) if interval > 0 => config.poll_interval = interval,
				_ => warn!(
					"invalid POLL_INTERVAL '{}', using default {}",
					value, config.poll_interval
				),
			}
		}

		if let Ok(value) = env::var("API") {
			match ApiMode::parse(&value) {
				Some(mode) => config.api = mode,
				None => warn!("invalid API mode '{}', using fallback", value),
			}
		}

		config.validate()?;
		Ok(Some(config))
	}

	/// Validates the configuration shape. Chain-prefix routing for the
	/// selected API mode is checked separately at startup by the caller.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.safe_addresses.is_empty() {
			return Err(ConfigError::validation_error(
				"at least one safe address is required",
			));
		}
		for addr in &self.safe_addresses {
			parse_prefixed_address(addr)?;
		}
		if self.poll_interval == 0 {
			return Err(ConfigError::validation_error(
				"poll interval must be positive",
			));
		}
		if self.telegram_bot_token.is_empty() || self.telegram_channel_id.is_empty() {
			return Err(ConfigError::validation_error(
				"telegram bot token and channel id are required",
			));
		}
		Ok(())
	}
}
