//! Telegram delivery channel.
//!
//! Messages are composed in a small Markdown dialect and converted to HTML
//! before posting, since Telegram's HTML parse mode is far more forgiving
//! than MarkdownV2 about unescaped payload characters.

use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde_json::json;

use crate::models::{Event, EventType, Signer};

use super::{NotificationError, Notifier};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

lazy_static! {
	/// Human-readable network names per chain prefix, for message text only.
	/// Unknown prefixes fall back to the raw prefix.
	static ref NETWORK_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
		// Testnets
		("gor", "Goerli Testnet"),
		("gnosis-chiado", "Gnosis Chiado Testnet"),
		("sep", "Sepolia Testnet"),
		("base-sepolia", "Base Sepolia Testnet"),
		// Mainnets
		("eth", "Eth Mainnet"),
		("matic", "Polygon"),
		("polygon", "Polygon"),
		("gno", "Gnosis Chain"),
		("base", "Base"),
		("arb", "Arbitrum"),
		("avalanche", "Avalanche"),
		("oeth", "Optimism"),
		("zkevm", "zkEVM"),
		("bsc", "Binance"),
		("aurora", "Aurora"),
		("blast", "Blast"),
		("celo", "Celo"),
		("linea", "Linea"),
		("mantle", "Mantle"),
		("scroll", "Scroll"),
		("worldchain", "Worldchain"),
		("xlayer", "XLayer"),
		("zksync", "zkSync"),
	]);

	static ref MD_BOLD: Regex = Regex::new(r"\*([^*]+)\*").unwrap();
	static ref MD_ITALIC: Regex = Regex::new(r"_([^_]+)_").unwrap();
	static ref MD_CODE: Regex = Regex::new(r"`([^`]+)`").unwrap();
	static ref MD_LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
}

fn action_label(event_type: EventType) -> &'static str {
	match event_type {
		EventType::Created => "created",
		EventType::Updated => "updated",
		EventType::Executed => "executed",
		EventType::Malicious => "ALERT! ACTION REQUIRED: MALICIOUS TRANSACTION DETECTED!",
	}
}

fn network_name(prefix: &str) -> &str {
	NETWORK_NAMES.get(prefix).copied().unwrap_or(prefix)
}

/// Bold name when configured, inline-code address otherwise.
fn print_signer(signer: &Signer) -> String {
	match &signer.name {
		Some(name) => format!("*{}*", name),
		None => format!("`{}`", signer.address),
	}
}

/// Converts the Markdown dialect used by the formatters into Telegram HTML.
fn markdown_to_html(text: &str) -> String {
	let html = MD_BOLD.replace_all(text, "<b>$1</b>");
	let html = MD_ITALIC.replace_all(&html, "<i>$1</i>");
	let html = MD_CODE.replace_all(&html, "<code>$1</code>");
	let html = MD_LINK.replace_all(&html, "<a href=\"$2\">$1</a>");
	html.into_owned()
}

/// Delivery channel posting to a Telegram bot chat.
pub struct TelegramNotifier {
	base_url: String,
	bot_token: String,
	channel_id: String,
	safe_url: String,
	client: reqwest::Client,
}

impl TelegramNotifier {
	pub fn new(
		bot_token: impl Into<String>,
		channel_id: impl Into<String>,
		safe_url: impl Into<String>,
	) -> Result<Self, NotificationError> {
		let bot_token = bot_token.into();
		let channel_id = channel_id.into();
		if bot_token.is_empty() || channel_id.is_empty() {
			return Err(NotificationError::config_error(
				"telegram bot token and channel id must be set",
			));
		}
		Ok(Self {
			base_url: TELEGRAM_API_URL.to_string(),
			bot_token,
			channel_id,
			safe_url: safe_url.into(),
			client: reqwest::Client::new(),
		})
	}

	/// Overrides the Telegram API host, for tests.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	fn queue_link(&self, chain_prefix: &str, safe_address: &str) -> String {
		format!(
			"{}/{}:{}/transactions/queue",
			self.safe_url, chain_prefix, safe_address
		)
	}

	fn format_event(&self, event: &Event) -> String {
		let tx = &event.tx;
		let headline = format!(
			"{} {} multisig [{}/{}] with safeTxHash `{}` and nonce `{}`",
			action_label(event.event_type),
			network_name(&event.chain_prefix),
			tx.confirmations.len(),
			tx.confirmations_required,
			tx.safe_tx_hash,
			tx.nonce
		);
		let proposer = format!("Proposed by: {}", print_signer(&tx.proposer));
		let signers = format!(
			"Signed by: {}",
			tx.confirmations
				.iter()
				.map(print_signer)
				.collect::<Vec<_>>()
				.join(", ")
		);
		let link = format!(
			"[🔗 transaction]({})",
			self.queue_link(&event.chain_prefix, &event.safe_address)
		);

		[headline, proposer, signers, link].join("\n\n")
	}

	fn format_startup_message(
		safe_addresses: &[String],
		nonce_stats: &HashMap<String, u64>,
	) -> String {
		let watched: Vec<String> = safe_addresses
			.iter()
			.map(|addr| {
				let (prefix, address) = addr.split_once(':').unwrap_or(("", addr.as_str()));
				let line = format!("{}: {}", network_name(prefix), address);
				match nonce_stats.get(addr) {
					Some(count) => format!("{} (Nonce: {})", line, count),
					None => line,
				}
			})
			.collect();

		let plural = if safe_addresses.len() > 1 { "es" } else { "" };
		format!(
			"🚀 *Safe Watcher Started*\n\nWatching {} Safe address{}:\n\n{}",
			safe_addresses.len(),
			plural,
			watched.join("\n\n")
		)
	}

	/// Announces the watched addresses, with unique-nonce counts where the
	/// startup listing produced them.
	pub async fn send_startup_message(
		&self,
		safe_addresses: &[String],
		nonce_stats: &HashMap<String, u64>,
	) -> Result<(), NotificationError> {
		info!("sending startup message to telegram");
		let text = Self::format_startup_message(safe_addresses, nonce_stats);
		self.post_message(&text).await
	}

	async fn post_message(&self, markdown: &str) -> Result<(), NotificationError> {
		let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
		let body = json!({
			"chat_id": self.channel_id,
			"parse_mode": "HTML",
			"text": markdown_to_html(markdown),
		});

		debug!("posting telegram message to chat {}", self.channel_id);
		let response = self.client.post(&url).json(&body).send().await?;
		if !response.status().is_success() {
			let status = response.status();
			let detail = response.text().await.unwrap_or_default();
			return Err(NotificationError::network_error(format!(
				"telegram API returned {}: {}",
				status, detail
			)));
		}
		Ok(())
	}
}

#[async_trait]
impl Notifier for TelegramNotifier {
	async fn send(&self, event: &Event) -> Result<(), NotificationError> {
		info!(
			"processing {} event for tx {}... with {} pending",
			event.event_type.as_str(),
			&event.tx.safe_tx_hash[..event.tx.safe_tx_hash.len().min(10)],
			event.pending.len()
		);
		let text = self.format_event(event);
		self.post_message(&text).await
	}
}
