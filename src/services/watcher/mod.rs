//! Per-wallet reconciliation loop.

mod error;
mod service;

pub use error::WatcherError;
pub use service::{
	is_malicious, pending_transactions, SafeWatcher, SafeWatcherHandle, SafeWatcherOptions,
	StartSummary,
};
