//! Notification delivery to the configured channels.
//!
//! Channels implement [`Notifier`]; [`NotificationSender`] fans one event out
//! to all of them concurrently. Delivery is best-effort: a failing channel is
//! logged and never blocks the others or the watcher.

mod error;
mod slack;
mod telegram;

pub use error::NotificationError;
pub use slack::SlackNotifier;
pub use telegram::TelegramNotifier;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, error};

use crate::models::Event;

/// A single delivery channel.
#[async_trait]
pub trait Notifier: Send + Sync {
	async fn send(&self, event: &Event) -> Result<(), NotificationError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
	async fn send(&self, event: &Event) -> Result<(), NotificationError> {
		self.as_ref().send(event).await
	}
}

/// Fan-out over every configured channel.
pub struct NotificationSender {
	notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationSender {
	pub fn new() -> Self {
		Self {
			notifiers: Vec::new(),
		}
	}

	pub fn add_notifier(&mut self, notifier: Box<dyn Notifier>) {
		self.notifiers.push(notifier);
	}

	/// Delivers the event to every channel concurrently. Failures are logged
	/// per channel and swallowed.
	pub async fn notify(&self, event: &Event) {
		debug!(
			"notifying {} channel(s) of {} event for {}",
			self.notifiers.len(),
			event.event_type.as_str(),
			event.tx.safe_tx_hash
		);
		let deliveries = self.notifiers.iter().map(|n| n.send(event));
		for result in join_all(deliveries).await {
			if let Err(e) = result {
				error!("notification delivery failed: {}", e);
			}
		}
	}
}

impl Default for NotificationSender {
	fn default() -> Self {
		Self::new()
	}
}
