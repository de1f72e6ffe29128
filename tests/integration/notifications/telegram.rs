//! Integration tests for the Telegram channel.

use mockito::Matcher;
use serde_json::json;

use safe_watcher::models::{Event, EventType, SafeTx, Signer};
use safe_watcher::services::notification::{Notifier, TelegramNotifier};

fn sample_event() -> Event {
	Event {
		event_type: EventType::Created,
		chain_prefix: "eth".to_string(),
		safe_address: "0x1111111111111111111111111111111111111111".to_string(),
		tx: SafeTx {
			safe_tx_hash: "0xhash".to_string(),
			nonce: 42,
			to: "0xtarget".to_string(),
			operation: 0,
			proposer: Signer {
				address: "0xaaa".to_string(),
				name: Some("Alice".to_string()),
			},
			confirmations: vec![Signer {
				address: "0xbbb".to_string(),
				name: None,
			}],
			confirmations_required: 2,
			is_executed: false,
		},
		pending: vec![],
	}
}

fn notifier(base_url: String) -> TelegramNotifier {
	TelegramNotifier::new("token", "chat", "https://app.safe.global")
		.unwrap()
		.with_base_url(base_url)
}

#[tokio::test]
async fn test_send_posts_html_message() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/bottoken/sendMessage")
		.match_body(Matcher::AllOf(vec![
			Matcher::PartialJson(json!({
				"chat_id": "chat",
				"parse_mode": "HTML",
			})),
			// signer names come out bold, addresses as inline code
			Matcher::Regex("<b>Alice</b>".to_string()),
			Matcher::Regex("<code>0xbbb</code>".to_string()),
			Matcher::Regex("transactions/queue".to_string()),
		]))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"ok": true}"#)
		.create_async()
		.await;

	notifier(server.url()).send(&sample_event()).await.unwrap();
	mock.assert_async().await;
}

#[tokio::test]
async fn test_send_surfaces_api_errors() {
	let mut server = mockito::Server::new_async().await;
	server
		.mock("POST", "/bottoken/sendMessage")
		.with_status(400)
		.with_body(r#"{"ok": false, "description": "Bad Request"}"#)
		.create_async()
		.await;

	let result = notifier(server.url()).send(&sample_event()).await;
	assert!(result.is_err());
}

#[tokio::test]
async fn test_startup_message_is_posted() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/bottoken/sendMessage")
		.match_body(Matcher::Regex("Safe Watcher Started".to_string()))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"ok": true}"#)
		.create_async()
		.await;

	let addresses = vec!["eth:0x1111111111111111111111111111111111111111".to_string()];
	notifier(server.url())
		.send_startup_message(&addresses, &Default::default())
		.await
		.unwrap();
	mock.assert_async().await;
}
