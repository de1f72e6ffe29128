//! Memoizing decorator over a [`SafeApi`].

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;

use crate::models::{ListedSafeTx, SafeTx};
use crate::services::safe::{FetchAllResult, SafeApi, SafeApiError};

/// Caches detailed transaction lookups of the wrapped source.
///
/// Detail payloads are immutable once fetched for the fields the watcher
/// cares about at creation time, so a hit never goes stale in a way that
/// matters. Listings stay uncached: they are the change signal.
pub struct CachedSafeApi<T: SafeApi> {
	inner: T,
	detailed: Mutex<HashMap<String, SafeTx<String>>>,
}

impl<T: SafeApi> CachedSafeApi<T> {
	pub fn new(inner: T) -> Self {
		Self {
			inner,
			detailed: Mutex::new(HashMap::new()),
		}
	}

	fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, SafeTx<String>>> {
		self.detailed.lock().unwrap_or_else(|e| e.into_inner())
	}
}

#[async_trait]
impl<T: SafeApi> SafeApi for CachedSafeApi<T> {
	async fn fetch_all(&self) -> Result<FetchAllResult, SafeApiError> {
		self.inner.fetch_all().await
	}

	async fn fetch_latest(&self) -> Result<Vec<ListedSafeTx>, SafeApiError> {
		self.inner.fetch_latest().await
	}

	async fn fetch_detailed(&self, safe_tx_hash: &str) -> Result<SafeTx<String>, SafeApiError> {
		if let Some(tx) = self.cache().get(safe_tx_hash) {
			debug!("detail cache hit for {}", safe_tx_hash);
			return Ok(tx.clone());
		}
		let tx = self.inner.fetch_detailed(safe_tx_hash).await?;
		self.cache().insert(safe_tx_hash.to_string(), tx.clone());
		Ok(tx)
	}
}
