//! Canonical transaction shapes.
//!
//! Both upstream APIs normalize into these types. `ListedSafeTx` is the
//! lightweight view returned by list endpoints; `SafeTx` carries the
//! signer-level detail fetched lazily when an event has to be emitted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Lightweight view of a multisig transaction from a list endpoint.
///
/// Identity is `safe_tx_hash`. Change detection compares only
/// `(is_executed, confirmations)`; the remaining fields are treated as
/// immutable once a hash exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedSafeTx {
	pub safe_tx_hash: String,
	/// Wallet-assigned sequence number. Not unique: conflicting proposals may
	/// share a nonce.
	pub nonce: u64,
	pub confirmations: u64,
	pub confirmations_required: u64,
	pub is_executed: bool,
}

impl ListedSafeTx {
	/// True when the two-field diff considers `current` a meaningful change
	/// relative to `self`.
	pub fn has_changed(&self, current: &ListedSafeTx) -> bool {
		self.is_executed != current.is_executed || self.confirmations != current.confirmations
	}
}

/// Detailed transaction used in notifications, generic over the signer
/// representation: adapters produce `SafeTx<String>` with raw addresses, the
/// watcher resolves configured names into `SafeTx<Signer>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeTx<S> {
	pub safe_tx_hash: String,
	pub nonce: u64,
	/// Call target address.
	pub to: String,
	/// Call-type discriminator: 0 is a direct call, anything else a
	/// delegate/batched call.
	pub operation: u64,
	pub proposer: S,
	pub confirmations: Vec<S>,
	pub confirmations_required: u64,
	pub is_executed: bool,
}

/// Signer address with an optional human-readable name for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signer {
	pub address: String,
	pub name: Option<String>,
}

impl SafeTx<String> {
	/// Resolves raw signer addresses against the configured address-to-name
	/// map. Unknown addresses keep `name: None`.
	pub fn with_signer_names(self, names: &HashMap<String, String>) -> SafeTx<Signer> {
		let resolve = |address: String| {
			let name = names.get(&address).cloned();
			Signer { address, name }
		};
		SafeTx {
			safe_tx_hash: self.safe_tx_hash,
			nonce: self.nonce,
			to: self.to,
			operation: self.operation,
			proposer: resolve(self.proposer),
			confirmations: self.confirmations.into_iter().map(resolve).collect(),
			confirmations_required: self.confirmations_required,
			is_executed: self.is_executed,
		}
	}
}
