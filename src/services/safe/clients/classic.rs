//! Adapter for the Safe Transaction Service ("classic") API.
//!
//! One Transaction Service deployment exists per supported chain; the chain
//! prefix selects the base URL. Responses are page envelopes with a `next`
//! cursor URL and an explicit `countUniqueNonce`.

use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::warn;
use serde::Deserialize;

use crate::models::{ListedSafeTx, SafeTx};
use crate::services::safe::{FetchAllResult, FetchRetry, SafeApi, SafeApiError};

lazy_static! {
	static ref TRANSACTION_SERVICE_URLS: HashMap<&'static str, &'static str> = HashMap::from([
		// Testnets
		("gor", "https://safe-transaction-goerli.safe.global"),
		("gnosis-chiado", "https://safe-transaction-chiado.safe.global"),
		("sep", "https://safe-transaction-sepolia.safe.global"),
		("base-sepolia", "https://safe-transaction-base-sepolia.safe.global"),
		// Mainnets
		("eth", "https://safe-transaction-mainnet.safe.global"),
		("matic", "https://safe-transaction-polygon.safe.global"),
		("polygon", "https://safe-transaction-polygon.safe.global"),
		("gno", "https://safe-transaction-gnosis-chain.safe.global"),
		("base", "https://safe-transaction-base.safe.global"),
		("arb", "https://safe-transaction-arbitrum.safe.global"),
		("avalanche", "https://safe-transaction-avalanche.safe.global"),
		("oeth", "https://safe-transaction-optimism.safe.global"),
		("zkevm", "https://safe-transaction-zkevm.safe.global"),
		("bsc", "https://safe-transaction-bsc.safe.global"),
		("aurora", "https://safe-transaction-aurora.safe.global"),
		("blast", "https://safe-transaction-blast.safe.global"),
		("celo", "https://safe-transaction-celo.safe.global"),
		("linea", "https://safe-transaction-linea.safe.global"),
		("mantle", "https://safe-transaction-mantle.safe.global"),
		("scroll", "https://safe-transaction-scroll.safe.global"),
		("worldchain", "https://safe-transaction-worldchain.safe.global"),
		("xlayer", "https://safe-transaction-xlayer.safe.global"),
		("zksync", "https://safe-transaction-zksync.safe.global"),
	]);
}

pub(crate) fn classic_base_url(prefix: &str) -> Option<&'static str> {
	TRANSACTION_SERVICE_URLS.get(prefix).copied()
}

/// Raw multisig transaction as returned by the Transaction Service. Only the
/// fields the canonical model needs are decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultisigTransaction {
	to: String,
	#[serde(default)]
	operation: Option<u64>,
	nonce: u64,
	safe_tx_hash: String,
	is_executed: bool,
	proposer: String,
	confirmations_required: u64,
	#[serde(default)]
	confirmations: Option<Vec<MultisigConfirmation>>,
}

#[derive(Debug, Clone, Deserialize)]
struct MultisigConfirmation {
	owner: String,
}

/// Page envelope of the multisig-transactions listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultisigTransactionPage {
	#[serde(default)]
	next: Option<String>,
	#[serde(default)]
	results: Vec<MultisigTransaction>,
	#[serde(default)]
	count_unique_nonce: Option<u64>,
}

fn normalize_listed(tx: &MultisigTransaction) -> ListedSafeTx {
	ListedSafeTx {
		safe_tx_hash: tx.safe_tx_hash.clone(),
		nonce: tx.nonce,
		confirmations: tx.confirmations.as_ref().map_or(0, |c| c.len() as u64),
		confirmations_required: tx.confirmations_required,
		is_executed: tx.is_executed,
	}
}

fn normalize_detailed(tx: &MultisigTransaction) -> SafeTx<String> {
	SafeTx {
		safe_tx_hash: tx.safe_tx_hash.clone(),
		nonce: tx.nonce,
		to: tx.to.clone(),
		operation: tx.operation.unwrap_or(0),
		proposer: tx.proposer.clone(),
		confirmations: tx
			.confirmations
			.as_deref()
			.unwrap_or_default()
			.iter()
			.map(|c| c.owner.clone())
			.collect(),
		confirmations_required: tx.confirmations_required,
		is_executed: tx.is_executed,
	}
}

/// Client for one safe on one Transaction Service deployment.
pub struct ClassicApi {
	prefix: String,
	address: String,
	transport: FetchRetry,
	base_url: Option<String>,
}

impl ClassicApi {
	pub fn new(
		prefix: impl Into<String>,
		address: impl Into<String>,
		transport: FetchRetry,
	) -> Self {
		Self {
			prefix: prefix.into(),
			address: address.into(),
			transport,
			base_url: None,
		}
	}

	/// Overrides the chain-prefix URL lookup, for tests and private
	/// deployments.
	pub fn with_base_url(
		prefix: impl Into<String>,
		address: impl Into<String>,
		transport: FetchRetry,
		base_url: impl Into<String>,
	) -> Self {
		Self {
			prefix: prefix.into(),
			address: address.into(),
			transport,
			base_url: Some(base_url.into()),
		}
	}

	fn api_url(&self) -> Result<String, SafeApiError> {
		if let Some(url) = &self.base_url {
			return Ok(url.clone());
		}
		classic_base_url(&self.prefix)
			.map(str::to_string)
			.ok_or_else(|| SafeApiError::unsupported_chain(&self.prefix))
	}

	fn list_url(&self) -> Result<String, SafeApiError> {
		Ok(format!(
			"{}/api/v1/safes/{}/multisig-transactions/",
			self.api_url()?,
			self.address
		))
	}

	fn detail_url(&self, safe_tx_hash: &str) -> Result<String, SafeApiError> {
		Ok(format!(
			"{}/api/v1/safes/{}/multisig-transactions/{}",
			self.api_url()?,
			self.address,
			safe_tx_hash
		))
	}

	async fn fetch_page(&self, url: &str) -> Result<MultisigTransactionPage, SafeApiError> {
		self.transport.get_json(url).await
	}
}

#[async_trait]
impl SafeApi for ClassicApi {
	async fn fetch_all(&self) -> Result<FetchAllResult, SafeApiError> {
		let first = self.fetch_page(&self.list_url()?).await?;
		let count_unique_nonce = first.count_unique_nonce;
		let mut results = first.results;
		let mut next = first.next;

		while let Some(url) = next {
			match self.fetch_page(&url).await {
				Ok(page) => {
					results.extend(page.results);
					next = page.next;
				}
				Err(e) => {
					// keep the partial listing rather than failing it whole
					warn!(
						"pagination aborted for {}:{}: {}",
						self.prefix, self.address, e
					);
					break;
				}
			}
		}

		Ok(FetchAllResult {
			txs: results.iter().map(normalize_listed).collect(),
			count_unique_nonce,
		})
	}

	async fn fetch_latest(&self) -> Result<Vec<ListedSafeTx>, SafeApiError> {
		let page = self.fetch_page(&self.list_url()?).await?;
		Ok(page.results.iter().map(normalize_listed).collect())
	}

	async fn fetch_detailed(&self, safe_tx_hash: &str) -> Result<SafeTx<String>, SafeApiError> {
		let tx: MultisigTransaction = self
			.transport
			.get_json(&self.detail_url(safe_tx_hash)?)
			.await?;
		Ok(normalize_detailed(&tx))
	}
}
