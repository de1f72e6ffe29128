//! HTTP transport with fixed-interval retries.
//!
//! Upstream Safe services fail transiently often enough that every fetch goes
//! through this transport. Retries are plain delay-retry: a fixed interval
//! between attempts, no backoff growth, no jitter. Response validation is
//! pluggable so callers decide what counts as a retryable response.

use std::time::Duration;

use log::debug;
use reqwest::Response;
use serde::de::DeserializeOwned;

use super::error::SafeApiError;

/// Configuration for the retry behavior
#[derive(Clone, Debug)]
pub struct RetryConfig {
	/// Number of retries after the initial attempt
	pub retries: u32,

	/// Fixed delay between attempts
	pub retry_interval: Duration,
}

impl Default for RetryConfig {
	/// 5 retries, one second apart
	fn default() -> Self {
		Self {
			retries: 5,
			retry_interval: Duration::from_secs(1),
		}
	}
}

/// HTTP fetcher with bounded fixed-interval retries.
///
/// Holds no state between calls beyond the reused connection pool.
#[derive(Clone, Debug)]
pub struct FetchRetry {
	client: reqwest::Client,
	config: RetryConfig,
}

impl FetchRetry {
	pub fn new(config: RetryConfig) -> Self {
		Self {
			client: reqwest::Client::new(),
			config,
		}
	}

	pub fn with_default_config() -> Self {
		Self::new(RetryConfig::default())
	}

	/// Performs a GET request, retrying on network errors and on responses
	/// rejected by `validate`.
	///
	/// Exactly `retries + 1` attempts are made before the final failure
	/// propagates to the caller.
	pub async fn fetch<V>(&self, url: &str, validate: V) -> Result<Response, SafeApiError>
	where
		V: Fn(&Response) -> Result<(), SafeApiError>,
	{
		let mut attempt: u32 = 0;
		loop {
			let result = match self.client.get(url).send().await {
				Ok(response) => validate(&response).map(|_| response),
				Err(e) => Err(SafeApiError::network_error(e.to_string())),
			};

			match result {
				Ok(response) => return Ok(response),
				Err(e) => {
					if attempt >= self.config.retries {
						return Err(e);
					}
					attempt += 1;
					debug!(
						"retrying {} (attempt {}/{})",
						url, attempt, self.config.retries
					);
					tokio::time::sleep(self.config.retry_interval).await;
				}
			}
		}
	}

	/// GET returning a deserialized JSON body, with the standard status and
	/// content-type validation applied before every attempt is accepted.
	pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SafeApiError> {
		debug!("fetching {}", url);
		let response = self.fetch(url, validate_json_response).await?;
		response.json::<T>().await.map_err(|e| {
			SafeApiError::parse_error(format!("invalid JSON body from {}: {}", url, e))
		})
	}
}

/// Rejects non-2xx statuses and non-JSON content types.
pub fn validate_json_response(response: &Response) -> Result<(), SafeApiError> {
	if !response.status().is_success() {
		return Err(SafeApiError::response_error(format!(
			"invalid response status: {}",
			response.status()
		)));
	}
	let content_type = response
		.headers()
		.get(reqwest::header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default();
	if !content_type.contains("application/json") {
		return Err(SafeApiError::response_error(format!(
			"invalid content type: '{}'",
			content_type
		)));
	}
	Ok(())
}
