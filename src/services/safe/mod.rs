//! Dual-source Safe transaction API abstraction.
//!
//! Two independent upstream services expose the same logical data with
//! different shapes: the Safe Transaction Service ("classic") and the Safe
//! Client Gateway ("alt"). Each adapter normalizes its own schema into the
//! canonical model; [`SafeApiWrapper`] composes both behind the single
//! [`SafeApi`] interface, selecting or falling back between them per the
//! configured mode.

mod clients;
mod constants;
mod error;
mod transport;
mod wrapper;

pub use clients::{CachedSafeApi, ClassicApi, GatewayApi};
pub use constants::MULTISEND_CALL_ONLY;
pub use error::SafeApiError;
pub use transport::{validate_json_response, FetchRetry, RetryConfig};
pub use wrapper::SafeApiWrapper;

use async_trait::async_trait;

use crate::models::{ApiMode, ListedSafeTx, SafeTx};

/// Aggregate result of a full listing.
#[derive(Debug, Clone, Default)]
pub struct FetchAllResult {
	pub txs: Vec<ListedSafeTx>,
	/// Count of distinct nonces seen, used only for startup reporting.
	pub count_unique_nonce: Option<u64>,
}

/// Canonical interface over the upstream transaction services.
#[async_trait]
pub trait SafeApi: Send + Sync {
	/// Lists every known transaction, following pagination to the end.
	async fn fetch_all(&self) -> Result<FetchAllResult, SafeApiError>;

	/// Fetches the first page of the listing only.
	async fn fetch_latest(&self) -> Result<Vec<ListedSafeTx>, SafeApiError>;

	/// Fetches a single transaction with signer-level detail.
	async fn fetch_detailed(&self, safe_tx_hash: &str) -> Result<SafeTx<String>, SafeApiError>;
}

/// True when `prefix` is routable under the given API mode. Used for startup
/// validation so an unmapped prefix never surfaces mid-poll.
pub fn supports_chain_prefix(prefix: &str, mode: ApiMode) -> bool {
	match mode {
		ApiMode::Classic => clients::classic_base_url(prefix).is_some(),
		ApiMode::Alt => clients::gateway_chain_id(prefix).is_some(),
		ApiMode::Fallback => {
			clients::classic_base_url(prefix).is_some()
				|| clients::gateway_chain_id(prefix).is_some()
		}
	}
}
