//! Watcher error types and handling.

use log::error;
use std::{error::Error, fmt};

use crate::models::ConfigError;
use crate::services::safe::SafeApiError;

/// Represents possible errors in the reconciliation loop
#[derive(Debug)]
pub enum WatcherError {
	/// Upstream API failure
	ApiError(SafeApiError),

	/// Invalid watcher configuration
	ConfigError(String),

	/// Failure while processing a single transaction
	ProcessingError(String),
}

impl WatcherError {
	fn format_message(&self) -> String {
		match self {
			Self::ApiError(e) => format!("API error: {}", e),
			Self::ConfigError(msg) => format!("Config error: {}", msg),
			Self::ProcessingError(msg) => format!("Processing error: {}", msg),
		}
	}

	/// Creates a new config error with logging
	pub fn config_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new processing error with logging
	pub fn processing_error(msg: impl Into<String>) -> Self {
		let error = Self::ProcessingError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for WatcherError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for WatcherError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::ApiError(e) => Some(e),
			_ => None,
		}
	}
}

impl From<SafeApiError> for WatcherError {
	fn from(err: SafeApiError) -> Self {
		Self::ApiError(err)
	}
}

impl From<ConfigError> for WatcherError {
	fn from(err: ConfigError) -> Self {
		Self::ConfigError(err.to_string())
	}
}
