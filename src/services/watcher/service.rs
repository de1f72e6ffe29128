//! Reconciliation of one safe against its upstream transaction listing.
//!
//! Each watcher owns the last-seen state of every transaction hash it has
//! observed and classifies listing changes into events. Only the watcher task
//! touches its state map, so no locking is needed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::{parse_prefixed_address, Event, EventType, ListedSafeTx, SafeTx, Signer};
use crate::services::notification::NotificationSender;
use crate::services::safe::{SafeApi, MULTISEND_CALL_ONLY};

use super::WatcherError;

/// Unexecuted transactions sorted by nonce. The sort is stable, so
/// conflicting proposals sharing a nonce keep their listing order.
pub fn pending_transactions(txs: &[ListedSafeTx]) -> Vec<ListedSafeTx> {
	let mut pending: Vec<ListedSafeTx> = txs.iter().filter(|tx| !tx.is_executed).cloned().collect();
	pending.sort_by_key(|tx| tx.nonce);
	pending
}

/// A transaction is flagged when it delegate-calls outside the known-safe
/// MultiSend deployments. Direct calls (operation 0) are never flagged.
pub fn is_malicious<S>(tx: &SafeTx<S>) -> bool {
	tx.operation != 0 && !MULTISEND_CALL_ONLY.contains(tx.to.to_lowercase().as_str())
}

/// Dependencies and identity of one watcher.
pub struct SafeWatcherOptions {
	/// Prefixed address, e.g. `eth:0x...`.
	pub safe: String,
	/// Signer address-to-name map for presentation.
	pub signers: HashMap<String, String>,
	pub api: Arc<dyn SafeApi>,
	pub notifier: Arc<NotificationSender>,
}

/// What the initial full listing found, for startup reporting.
#[derive(Debug, Clone, Copy)]
pub struct StartSummary {
	pub tracked: usize,
	pub unique_nonces: Option<u64>,
}

/// Watches a single safe and emits events on state transitions.
pub struct SafeWatcher {
	prefix: String,
	address: String,
	api: Arc<dyn SafeApi>,
	notifier: Arc<NotificationSender>,
	signers: HashMap<String, String>,
	txs: HashMap<String, ListedSafeTx>,
}

impl SafeWatcher {
	pub fn new(opts: SafeWatcherOptions) -> Result<Self, WatcherError> {
		let (prefix, address) = parse_prefixed_address(&opts.safe)?;
		Ok(Self {
			prefix,
			address,
			api: opts.api,
			notifier: opts.notifier,
			signers: opts.signers,
			txs: HashMap::new(),
		})
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn address(&self) -> &str {
		&self.address
	}

	/// Seeds the state map from a full listing. Everything already known at
	/// startup is baseline: no events are emitted for it.
	pub async fn start(&mut self) -> Result<StartSummary, WatcherError> {
		let listing = self.api.fetch_all().await?;
		for tx in &listing.txs {
			self.txs.insert(tx.safe_tx_hash.clone(), tx.clone());
		}
		info!(
			"started watcher for {}:{} tracking {} txs",
			self.prefix,
			self.address,
			self.txs.len()
		);
		Ok(StartSummary {
			tracked: listing.txs.len(),
			unique_nonces: listing.count_unique_nonce,
		})
	}

	/// Runs one reconciliation cycle.
	///
	/// Assumes every change since the previous cycle fits into one listing
	/// page. A failure while processing one transaction is logged and does
	/// not block the rest of the batch.
	pub async fn poll(&mut self) -> Result<(), WatcherError> {
		let txs = self.api.fetch_latest().await?;
		let pending = pending_transactions(&txs);

		for tx in txs {
			let result = match self.txs.get(&tx.safe_tx_hash).cloned() {
				Some(old) => self.process_update(tx, &old, &pending).await,
				None => self.process_new(tx, &pending).await,
			};
			if let Err(e) = result {
				error!("{}:{}: {}", self.prefix, self.address, e);
			}
		}
		Ok(())
	}

	async fn process_new(
		&mut self,
		tx: ListedSafeTx,
		pending: &[ListedSafeTx],
	) -> Result<(), WatcherError> {
		info!(
			"detected new tx {} with nonce {}",
			tx.safe_tx_hash, tx.nonce
		);
		let hash = tx.safe_tx_hash.clone();
		self.txs.insert(hash.clone(), tx);

		let detailed = self.fetch_detailed(&hash).await?;
		let event_type = if is_malicious(&detailed) {
			EventType::Malicious
		} else {
			EventType::Created
		};
		self.emit(event_type, detailed, pending).await;
		Ok(())
	}

	async fn process_update(
		&mut self,
		tx: ListedSafeTx,
		old: &ListedSafeTx,
		pending: &[ListedSafeTx],
	) -> Result<(), WatcherError> {
		let hash = tx.safe_tx_hash.clone();
		let changed = old.has_changed(&tx);
		let executed = tx.is_executed;
		self.txs.insert(hash.clone(), tx);
		if !changed {
			return Ok(());
		}
		info!(
			"detected updated tx {} (executed: {})",
			hash, executed
		);

		let detailed = self.fetch_detailed(&hash).await?;
		let event_type = if executed {
			EventType::Executed
		} else {
			EventType::Updated
		};
		self.emit(event_type, detailed, pending).await;
		Ok(())
	}

	async fn fetch_detailed(&self, safe_tx_hash: &str) -> Result<SafeTx<Signer>, WatcherError> {
		let tx = self.api.fetch_detailed(safe_tx_hash).await?;
		Ok(tx.with_signer_names(&self.signers))
	}

	async fn emit(&self, event_type: EventType, tx: SafeTx<Signer>, pending: &[ListedSafeTx]) {
		let event = Event {
			event_type,
			chain_prefix: self.prefix.clone(),
			safe_address: self.address.clone(),
			tx,
			pending: pending.to_vec(),
		};
		self.notifier.notify(&event).await;
	}

	/// Moves the watcher onto its own task, polling at the given interval.
	///
	/// The first poll happens one interval after spawn. Cycles never overlap:
	/// a cycle that outruns the interval delays the next tick instead. A zero
	/// interval disables polling, leaving only the seeded baseline.
	pub fn spawn(mut self, poll_interval: Duration) -> SafeWatcherHandle {
		let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

		let handle = tokio::spawn(async move {
			if poll_interval.is_zero() {
				return;
			}
			let mut interval = tokio::time::interval(poll_interval);
			interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
			// the first tick of a fresh interval fires immediately
			interval.tick().await;

			loop {
				tokio::select! {
					_ = shutdown_rx.changed() => break,
					_ = interval.tick() => {
						if let Err(e) = self.poll().await {
							error!("poll cycle failed for {}:{}: {}", self.prefix, self.address, e);
						}
					}
				}
			}
		});

		SafeWatcherHandle {
			shutdown: shutdown_tx,
			handle,
		}
	}
}

/// Controls a spawned watcher task.
pub struct SafeWatcherHandle {
	shutdown: watch::Sender<bool>,
	handle: JoinHandle<()>,
}

impl SafeWatcherHandle {
	/// Requests shutdown. An in-flight cycle finishes first; the task stops
	/// at the next tick boundary.
	pub fn stop(&self) {
		let _ = self.shutdown.send(true);
	}

	pub async fn join(self) {
		let _ = self.handle.await;
	}
}
