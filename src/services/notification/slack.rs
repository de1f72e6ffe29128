//! Slack delivery channel using Block Kit webhook payloads.

use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

use crate::models::{Event, EventType, Signer};

use super::{NotificationError, Notifier};

/// Bold name when configured, inline-code address otherwise.
fn format_signer(signer: &Signer) -> String {
	match &signer.name {
		Some(name) => format!("*{}*", name),
		None => format!("`{}`", signer.address),
	}
}

fn mrkdwn_section(text: String) -> Value {
	json!({
		"type": "section",
		"text": {
			"type": "mrkdwn",
			"text": text,
		}
	})
}

/// Delivery channel posting to a Slack incoming webhook.
pub struct SlackNotifier {
	webhook_url: String,
	safe_url: String,
	client: reqwest::Client,
}

impl SlackNotifier {
	pub fn new(
		webhook_url: impl Into<String>,
		safe_url: impl Into<String>,
	) -> Result<Self, NotificationError> {
		let webhook_url = webhook_url.into();
		if webhook_url.is_empty() {
			return Err(NotificationError::config_error(
				"slack webhook URL must be set",
			));
		}
		Ok(Self {
			webhook_url,
			safe_url: safe_url.into(),
			client: reqwest::Client::new(),
		})
	}

	fn format_event(&self, event: &Event) -> Value {
		let tx = &event.tx;
		let action = event.event_type.as_str();

		let mut blocks = vec![
			mrkdwn_section(format!(
				"*Transaction {}*\nChain: {}\nSafe: {}\nTx Hash: `{}`\nNonce: `{}`",
				action, event.chain_prefix, event.safe_address, tx.safe_tx_hash, tx.nonce
			)),
			mrkdwn_section(format!(
				"*Signatures*: {}/{}",
				tx.confirmations.len(),
				tx.confirmations_required
			)),
			mrkdwn_section(format!("*Proposer*: {}", format_signer(&tx.proposer))),
			mrkdwn_section(format!(
				"*Signers*: {}",
				tx.confirmations
					.iter()
					.map(format_signer)
					.collect::<Vec<_>>()
					.join(", ")
			)),
			json!({
				"type": "actions",
				"elements": [{
					"type": "button",
					"text": {
						"type": "plain_text",
						"text": "View Transaction",
					},
					"url": format!(
						"{}/{}:{}/transactions/queue",
						self.safe_url, event.chain_prefix, event.safe_address
					),
				}]
			}),
		];

		if event.event_type == EventType::Malicious {
			blocks.insert(
				0,
				mrkdwn_section(
					"🚨 *ALERT! ACTION REQUIRED: MALICIOUS TRANSACTION DETECTED!* 🚨".to_string(),
				),
			);
		}

		json!({
			"blocks": blocks,
			// plain-text fallback for clients that do not render blocks
			"text": format!(
				"Transaction {} [{}/{}] with safeTxHash {}",
				action,
				tx.confirmations.len(),
				tx.confirmations_required,
				tx.safe_tx_hash
			),
		})
	}
}

#[async_trait]
impl Notifier for SlackNotifier {
	async fn send(&self, event: &Event) -> Result<(), NotificationError> {
		let payload = self.format_event(event);
		debug!("posting slack message for tx {}", event.tx.safe_tx_hash);
		let response = self.client.post(&self.webhook_url).json(&payload).send().await?;
		if !response.status().is_success() {
			let status = response.status();
			let detail = response.text().await.unwrap_or_default();
			return Err(NotificationError::network_error(format!(
				"slack webhook returned {}: {}",
				status, detail
			)));
		}
		Ok(())
	}
}
