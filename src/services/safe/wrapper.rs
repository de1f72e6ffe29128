//! Mode-driven composition of the two upstream sources.

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, warn};

use crate::models::{ApiMode, ListedSafeTx, SafeTx};
use crate::services::safe::clients::{CachedSafeApi, ClassicApi, GatewayApi};
use crate::services::safe::{FetchAllResult, FetchRetry, SafeApi, SafeApiError};

/// Routes each call to the classic service, the gateway, or both.
///
/// In fallback mode the classic service is tried first and the gateway only
/// on failure. The choice is made per call: a classic failure does not stick,
/// the next call starts from classic again.
pub struct SafeApiWrapper {
	classic: Arc<dyn SafeApi>,
	gateway: Arc<dyn SafeApi>,
	mode: ApiMode,
}

impl SafeApiWrapper {
	pub fn new(classic: Arc<dyn SafeApi>, gateway: Arc<dyn SafeApi>, mode: ApiMode) -> Self {
		Self {
			classic,
			gateway,
			mode,
		}
	}

	/// Builds the wrapper for one safe with both adapters behind detail
	/// caches, sharing the given transport.
	pub fn for_safe(prefix: &str, address: &str, mode: ApiMode, transport: FetchRetry) -> Self {
		Self::new(
			Arc::new(CachedSafeApi::new(ClassicApi::new(
				prefix,
				address,
				transport.clone(),
			))),
			Arc::new(CachedSafeApi::new(GatewayApi::new(
				prefix, address, transport,
			))),
			mode,
		)
	}

	fn log_fallback(e: &SafeApiError) {
		error!("{}", e);
		warn!("falling back to alternative api");
	}
}

#[async_trait]
impl SafeApi for SafeApiWrapper {
	async fn fetch_all(&self) -> Result<FetchAllResult, SafeApiError> {
		match self.mode {
			ApiMode::Classic => self.classic.fetch_all().await,
			ApiMode::Alt => self.gateway.fetch_all().await,
			ApiMode::Fallback => match self.classic.fetch_all().await {
				Ok(result) => Ok(result),
				Err(e) => {
					Self::log_fallback(&e);
					self.gateway.fetch_all().await
				}
			},
		}
	}

	async fn fetch_latest(&self) -> Result<Vec<ListedSafeTx>, SafeApiError> {
		match self.mode {
			ApiMode::Classic => self.classic.fetch_latest().await,
			ApiMode::Alt => self.gateway.fetch_latest().await,
			ApiMode::Fallback => match self.classic.fetch_latest().await {
				Ok(txs) => Ok(txs),
				Err(e) => {
					Self::log_fallback(&e);
					self.gateway.fetch_latest().await
				}
			},
		}
	}

	async fn fetch_detailed(&self, safe_tx_hash: &str) -> Result<SafeTx<String>, SafeApiError> {
		match self.mode {
			ApiMode::Classic => self.classic.fetch_detailed(safe_tx_hash).await,
			ApiMode::Alt => self.gateway.fetch_detailed(safe_tx_hash).await,
			ApiMode::Fallback => match self.classic.fetch_detailed(safe_tx_hash).await {
				Ok(tx) => Ok(tx),
				Err(e) => {
					Self::log_fallback(&e);
					self.gateway.fetch_detailed(safe_tx_hash).await
				}
			},
		}
	}
}
