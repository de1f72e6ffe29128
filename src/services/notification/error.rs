//! Notification error types and handling.

use log::error;
use std::{error::Error, fmt};

/// Represents possible errors while delivering notifications
#[derive(Debug)]
pub enum NotificationError {
	/// Network-level or HTTP delivery failure
	NetworkError(String),

	/// Channel credentials or settings are unusable
	ConfigError(String),
}

impl NotificationError {
	fn format_message(&self) -> String {
		match self {
			Self::NetworkError(msg) => format!("Network error: {}", msg),
			Self::ConfigError(msg) => format!("Config error: {}", msg),
		}
	}

	/// Creates a new network error with logging
	pub fn network_error(msg: impl Into<String>) -> Self {
		let error = Self::NetworkError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new config error with logging
	pub fn config_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for NotificationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for NotificationError {}

impl From<reqwest::Error> for NotificationError {
	fn from(err: reqwest::Error) -> Self {
		Self::network_error(err.to_string())
	}
}
