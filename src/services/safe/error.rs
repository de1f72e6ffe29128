//! Safe API error types and handling.

use log::error;
use std::{error::Error, fmt};

/// Represents possible errors while talking to the upstream Safe APIs
#[derive(Debug)]
pub enum SafeApiError {
	/// No upstream service is known for the requested chain prefix.
	///
	/// This is a configuration error: it is raised at first use and is not
	/// retried. Callers should surface it during startup validation.
	UnsupportedChain(String),

	/// Network-level failure (connection, timeout, protocol)
	NetworkError(String),

	/// The upstream answered with an unusable response (bad status or
	/// content type)
	ResponseError(String),

	/// The response body could not be decoded into the expected shape
	ParseError(String),
}

impl SafeApiError {
	fn format_message(&self) -> String {
		match self {
			Self::UnsupportedChain(prefix) => {
				format!("Unsupported chain: no API for prefix '{}'", prefix)
			}
			Self::NetworkError(msg) => format!("Network error: {}", msg),
			Self::ResponseError(msg) => format!("Response error: {}", msg),
			Self::ParseError(msg) => format!("Parse error: {}", msg),
		}
	}

	/// Creates a new unsupported chain error with logging
	pub fn unsupported_chain(prefix: impl Into<String>) -> Self {
		let error = Self::UnsupportedChain(prefix.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new network error with logging
	pub fn network_error(msg: impl Into<String>) -> Self {
		let error = Self::NetworkError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new response error with logging
	pub fn response_error(msg: impl Into<String>) -> Self {
		let error = Self::ResponseError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new parse error with logging
	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for SafeApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for SafeApiError {}

impl From<reqwest::Error> for SafeApiError {
	fn from(err: reqwest::Error) -> Self {
		Self::network_error(err.to_string())
	}
}
