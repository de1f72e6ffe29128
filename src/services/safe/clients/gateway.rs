//! Adapter for the Safe Client Gateway ("alt") API.
//!
//! A single gateway serves every chain, keyed by numeric chain id. List
//! results wrap transactions in queue items whose id encodes the safe
//! address and hash as `multisig_<safe>_<hash>`; execution state is an
//! enumerated status rather than a boolean.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use serde::Deserialize;

use crate::models::{ListedSafeTx, SafeTx};
use crate::services::safe::{FetchAllResult, FetchRetry, SafeApi, SafeApiError};

const GATEWAY_URL: &str = "https://safe-client.safe.global";

/// Sentinel proposer when a transaction has no confirmations yet.
const ZERO_ADDRESS: &str = "0x0";

/// Gateway status value that marks a finally-executed transaction.
const STATUS_SUCCESS: &str = "SUCCESS";

lazy_static! {
	static ref CHAIN_IDS: HashMap<&'static str, u64> = HashMap::from([
		// Testnets
		("gor", 5),
		("gchi", 10200),  // gnosis chiado
		("sep", 11155111),
		("bsep", 84532),  // base sepolia
		// Mainnets
		("eth", 1),
		("matic", 137),
		("poly", 137),  // polygon alias
		("gno", 100),
		("base", 8453),
		("arb", 42161),
		("avax", 43114),
		("oeth", 10),  // optimism
		("pzkv", 1101),  // polygon zkevm
		("bsc", 56),
		("aur", 1313161554),  // aurora
		("blast", 81457),
		("celo", 42220),
		("line", 59144),  // linea
		("mant", 5000),  // mantle
		("scrl", 534352),  // scroll
		("wrld", 196),  // worldchain
		("xlay", 196),  // xlayer
		("zks", 324),  // zksync
	]);
}

pub(crate) fn gateway_chain_id(prefix: &str) -> Option<u64> {
	CHAIN_IDS.get(prefix).copied()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueuePage {
	#[serde(default)]
	next: Option<String>,
	#[serde(default)]
	results: Vec<QueueItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct QueueItem {
	transaction: QueuedTransaction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueuedTransaction {
	/// `multisig_<safe>_<safeTxHash>`
	id: String,
	tx_status: String,
	execution_info: ExecutionInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionInfo {
	nonce: u64,
	confirmations_required: u64,
	confirmations_submitted: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionDetails {
	tx_id: String,
	tx_status: String,
	tx_data: TxData,
	detailed_execution_info: DetailedExecutionInfo,
}

#[derive(Debug, Clone, Deserialize)]
struct TxData {
	to: AddressInfo,
	#[serde(default)]
	operation: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct AddressInfo {
	value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailedExecutionInfo {
	nonce: u64,
	confirmations_required: u64,
	#[serde(default)]
	confirmations: Vec<GatewayConfirmation>,
}

#[derive(Debug, Clone, Deserialize)]
struct GatewayConfirmation {
	signer: AddressInfo,
}

/// Recovers the safe transaction hash from a `multisig_<safe>_<hash>` id.
fn parse_tx_id(id: &str) -> Result<String, SafeApiError> {
	let mut parts = id.splitn(3, '_');
	match (parts.next(), parts.next(), parts.next()) {
		(Some("multisig"), Some(_), Some(hash)) if !hash.is_empty() => Ok(hash.to_string()),
		_ => Err(SafeApiError::parse_error(format!(
			"unexpected transaction id '{}'",
			id
		))),
	}
}

fn normalize_listed(tx: &QueuedTransaction) -> Result<ListedSafeTx, SafeApiError> {
	Ok(ListedSafeTx {
		safe_tx_hash: parse_tx_id(&tx.id)?,
		nonce: tx.execution_info.nonce,
		confirmations: tx.execution_info.confirmations_submitted,
		confirmations_required: tx.execution_info.confirmations_required,
		is_executed: tx.tx_status == STATUS_SUCCESS,
	})
}

fn normalize_detailed(tx: &TransactionDetails) -> Result<SafeTx<String>, SafeApiError> {
	let info = &tx.detailed_execution_info;
	// the gateway has no reliable proposer field; fall back to the first
	// confirming signer, then the zero-address sentinel
	let proposer = info
		.confirmations
		.first()
		.map(|c| c.signer.value.clone())
		.unwrap_or_else(|| ZERO_ADDRESS.to_string());
	Ok(SafeTx {
		safe_tx_hash: parse_tx_id(&tx.tx_id)?,
		nonce: info.nonce,
		to: tx.tx_data.to.value.clone(),
		operation: tx.tx_data.operation.unwrap_or(0),
		proposer,
		confirmations: info
			.confirmations
			.iter()
			.map(|c| c.signer.value.clone())
			.collect(),
		confirmations_required: info.confirmations_required,
		is_executed: tx.tx_status == STATUS_SUCCESS,
	})
}

/// Client for one safe via the Safe Client Gateway.
pub struct GatewayApi {
	prefix: String,
	address: String,
	transport: FetchRetry,
	base_url: Option<String>,
}

impl GatewayApi {
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

	/// Overrides the gateway host, for tests.
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
		let chain_id = gateway_chain_id(&self.prefix)
			.ok_or_else(|| SafeApiError::unsupported_chain(&self.prefix))?;
		let host = self.base_url.as_deref().unwrap_or(GATEWAY_URL);
		Ok(format!("{}/v1/chains/{}", host, chain_id))
	}

	fn list_url(&self) -> Result<String, SafeApiError> {
		Ok(format!(
			"{}/safes/{}/multisig-transactions",
			self.api_url()?,
			self.address
		))
	}

	fn detail_url(&self, safe_tx_hash: &str) -> Result<String, SafeApiError> {
		Ok(format!("{}/transactions/{}", self.api_url()?, safe_tx_hash))
	}

	async fn fetch_list(&self, url: &str) -> Result<QueuePage, SafeApiError> {
		self.transport.get_json(url).await
	}

	fn collect_page(
		page: QueuePage,
		results: &mut Vec<ListedSafeTx>,
		unique_nonces: &mut HashSet<u64>,
	) -> Option<String> {
		for item in &page.results {
			match normalize_listed(&item.transaction) {
				Ok(tx) => {
					unique_nonces.insert(tx.nonce);
					results.push(tx);
				}
				Err(e) => warn!("skipping malformed queue item: {}", e),
			}
		}
		page.next
	}
}

#[async_trait]
impl SafeApi for GatewayApi {
	async fn fetch_all(&self) -> Result<FetchAllResult, SafeApiError> {
		let mut results = Vec::new();
		// the gateway does not report countUniqueNonce; count distinct
		// nonces across the listing instead
		let mut unique_nonces = HashSet::new();

		let first = self.fetch_list(&self.list_url()?).await?;
		let mut next = Self::collect_page(first, &mut results, &mut unique_nonces);

		while let Some(url) = next {
			match self.fetch_list(&url).await {
				Ok(page) => {
					next = Self::collect_page(page, &mut results, &mut unique_nonces);
				}
				Err(e) => {
					warn!(
						"pagination aborted for {}:{}: {}",
						self.prefix, self.address, e
					);
					break;
				}
			}
		}

		Ok(FetchAllResult {
			txs: results,
			count_unique_nonce: Some(unique_nonces.len() as u64),
		})
	}

	async fn fetch_latest(&self) -> Result<Vec<ListedSafeTx>, SafeApiError> {
		let page = self.fetch_list(&self.list_url()?).await?;
		page.results
			.iter()
			.map(|item| normalize_listed(&item.transaction))
			.collect()
	}

	async fn fetch_detailed(&self, safe_tx_hash: &str) -> Result<SafeTx<String>, SafeApiError> {
		debug!("loading tx {}", safe_tx_hash);
		let tx: TransactionDetails = self
			.transport
			.get_json(&self.detail_url(safe_tx_hash)?)
			.await?;
		normalize_detailed(&tx)
	}
}
