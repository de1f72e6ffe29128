//! Events emitted by the reconciliation loop.

use serde::Serialize;

use super::transaction::{ListedSafeTx, SafeTx, Signer};

/// Classification of a state transition detected for a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
	Created,
	Updated,
	Executed,
	/// A delegate/batched call to a target outside the known-safe allow-list.
	Malicious,
}

impl EventType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Created => "created",
			Self::Updated => "updated",
			Self::Executed => "executed",
			Self::Malicious => "malicious",
		}
	}
}

/// A classified transaction state transition, handed to the notification
/// sink. `pending` is the sorted list of currently-unexecuted transactions at
/// emission time, included as context for the notification only.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
	pub event_type: EventType,
	pub chain_prefix: String,
	pub safe_address: String,
	pub tx: SafeTx<Signer>,
	pub pending: Vec<ListedSafeTx>,
}
