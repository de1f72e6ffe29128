//! Integration tests for the per-wallet reconciliation loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mockall::predicate::eq;

use safe_watcher::models::EventType;
use safe_watcher::services::notification::NotificationSender;
use safe_watcher::services::safe::{FetchAllResult, SafeApiError};
use safe_watcher::services::watcher::{SafeWatcher, SafeWatcherOptions, WatcherError};

use crate::integration::mocks::{
	create_test_detailed_tx, create_test_listed_tx, MockNotifier, MockSafeApi,
};

const SAFE: &str = "eth:0x1111111111111111111111111111111111111111";

/// The MultiSend call-only deployment considered a benign delegate target.
const MULTISEND: &str = "0x9641d764fc13c8b624c04430c7356c1c7c8102e2";

fn build_watcher(
	api: MockSafeApi,
	notifier: MockNotifier,
	signers: HashMap<String, String>,
) -> SafeWatcher {
	let mut sender = NotificationSender::new();
	sender.add_notifier(Box::new(notifier));
	SafeWatcher::new(SafeWatcherOptions {
		safe: SAFE.to_string(),
		signers,
		api: Arc::new(api),
		notifier: Arc::new(sender),
	})
	.unwrap()
}

fn build_default_watcher(api: MockSafeApi, notifier: MockNotifier) -> SafeWatcher {
	build_watcher(api, notifier, HashMap::new())
}

#[tokio::test]
async fn test_startup_baseline_emits_no_events() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all().times(1).returning(|| {
		Ok(FetchAllResult {
			txs: vec![
				create_test_listed_tx("0xa", 1, 1, false),
				create_test_listed_tx("0xb", 2, 2, true),
			],
			count_unique_nonce: Some(2),
		})
	});
	let mut notifier = MockNotifier::new();
	notifier.expect_send().never();

	let mut watcher = build_default_watcher(api, notifier);
	let summary = watcher.start().await.unwrap();
	assert_eq!(summary.tracked, 2);
	assert_eq!(summary.unique_nonces, Some(2));
}

#[tokio::test]
async fn test_new_tx_emits_created_once_then_silent() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all()
		.returning(|| Ok(FetchAllResult::default()));
	api.expect_fetch_latest()
		.times(2)
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 1, false)]));
	api.expect_fetch_detailed()
		.with(eq("0xa"))
		.times(1)
		.returning(|_| Ok(create_test_detailed_tx("0xa", "0xtarget", 0)));

	let mut notifier = MockNotifier::new();
	notifier
		.expect_send()
		.withf(|event| {
			event.event_type == EventType::Created
				&& event.chain_prefix == "eth"
				&& event.pending.len() == 1
		})
		.times(1)
		.returning(|_| Ok(()));

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	watcher.poll().await.unwrap();
	// identical snapshot on the next cycle produces nothing
	watcher.poll().await.unwrap();
}

#[tokio::test]
async fn test_execution_emits_executed_once() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all().returning(|| {
		Ok(FetchAllResult {
			txs: vec![create_test_listed_tx("0xa", 1, 2, false)],
			count_unique_nonce: Some(1),
		})
	});
	api.expect_fetch_latest()
		.times(2)
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 2, true)]));
	api.expect_fetch_detailed()
		.with(eq("0xa"))
		.times(1)
		.returning(|_| Ok(create_test_detailed_tx("0xa", "0xtarget", 0)));

	let mut notifier = MockNotifier::new();
	notifier
		.expect_send()
		.withf(|event| event.event_type == EventType::Executed && event.pending.is_empty())
		.times(1)
		.returning(|_| Ok(()));

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	watcher.poll().await.unwrap();
	watcher.poll().await.unwrap();
}

#[tokio::test]
async fn test_confirmation_change_emits_updated() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all().returning(|| {
		Ok(FetchAllResult {
			txs: vec![create_test_listed_tx("0xa", 1, 1, false)],
			count_unique_nonce: Some(1),
		})
	});
	api.expect_fetch_latest()
		.times(1)
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 2, false)]));
	api.expect_fetch_detailed()
		.with(eq("0xa"))
		.times(1)
		.returning(|_| Ok(create_test_detailed_tx("0xa", "0xtarget", 0)));

	let mut notifier = MockNotifier::new();
	notifier
		.expect_send()
		.withf(|event| event.event_type == EventType::Updated)
		.times(1)
		.returning(|_| Ok(()));

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	watcher.poll().await.unwrap();
}

#[tokio::test]
async fn test_delegate_call_to_unknown_target_is_malicious() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all()
		.returning(|| Ok(FetchAllResult::default()));
	api.expect_fetch_latest()
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 1, false)]));
	api.expect_fetch_detailed()
		.returning(|_| Ok(create_test_detailed_tx("0xa", "0xevil", 1)));

	let mut notifier = MockNotifier::new();
	notifier
		.expect_send()
		.withf(|event| event.event_type == EventType::Malicious)
		.times(1)
		.returning(|_| Ok(()));

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	watcher.poll().await.unwrap();
}

#[tokio::test]
async fn test_delegate_call_to_multisend_is_created() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all()
		.returning(|| Ok(FetchAllResult::default()));
	api.expect_fetch_latest()
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 1, false)]));
	api.expect_fetch_detailed()
		.returning(|_| Ok(create_test_detailed_tx("0xa", MULTISEND, 1)));

	let mut notifier = MockNotifier::new();
	notifier
		.expect_send()
		.withf(|event| event.event_type == EventType::Created)
		.times(1)
		.returning(|_| Ok(()));

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	watcher.poll().await.unwrap();
}

#[tokio::test]
async fn test_signer_names_are_resolved() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all()
		.returning(|| Ok(FetchAllResult::default()));
	api.expect_fetch_latest()
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 1, false)]));
	api.expect_fetch_detailed()
		.returning(|_| Ok(create_test_detailed_tx("0xa", "0xtarget", 0)));

	let mut notifier = MockNotifier::new();
	notifier
		.expect_send()
		.withf(|event| {
			event.tx.proposer.name.as_deref() == Some("Alice")
				&& event.tx.confirmations[0].name.as_deref() == Some("Alice")
		})
		.times(1)
		.returning(|_| Ok(()));

	let mut signers = HashMap::new();
	signers.insert("0xaaa".to_string(), "Alice".to_string());

	let mut watcher = build_watcher(api, notifier, signers);
	watcher.start().await.unwrap();
	watcher.poll().await.unwrap();
}

#[tokio::test]
async fn test_failure_on_one_tx_does_not_block_others() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all()
		.returning(|| Ok(FetchAllResult::default()));
	api.expect_fetch_latest().returning(|| {
		Ok(vec![
			create_test_listed_tx("0xa", 1, 1, false),
			create_test_listed_tx("0xb", 2, 1, false),
		])
	});
	api.expect_fetch_detailed()
		.with(eq("0xa"))
		.returning(|_| Err(SafeApiError::network_error("detail fetch failed")));
	api.expect_fetch_detailed()
		.with(eq("0xb"))
		.returning(|_| Ok(create_test_detailed_tx("0xb", "0xtarget", 0)));

	let mut notifier = MockNotifier::new();
	notifier
		.expect_send()
		.withf(|event| event.tx.safe_tx_hash == "0xb")
		.times(1)
		.returning(|_| Ok(()));

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	watcher.poll().await.unwrap();
}

#[tokio::test]
async fn test_listing_failure_propagates() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all()
		.returning(|| Ok(FetchAllResult::default()));
	api.expect_fetch_latest()
		.returning(|| Err(SafeApiError::network_error("listing unavailable")));

	let mut notifier = MockNotifier::new();
	notifier.expect_send().never();

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	let result = watcher.poll().await;
	assert!(matches!(result, Err(WatcherError::ApiError(_))));
}

#[tokio::test]
async fn test_spawned_watcher_polls_until_stopped() {
	let calls = Arc::new(AtomicUsize::new(0));

	let mut api = MockSafeApi::new();
	api.expect_fetch_all()
		.returning(|| Ok(FetchAllResult::default()));
	let counter = calls.clone();
	api.expect_fetch_latest().returning(move || {
		counter.fetch_add(1, Ordering::SeqCst);
		Ok(vec![])
	});

	let mut notifier = MockNotifier::new();
	notifier.expect_send().never();

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	let handle = watcher.spawn(Duration::from_millis(20));

	tokio::time::sleep(Duration::from_millis(90)).await;
	handle.stop();
	handle.join().await;

	let seen = calls.load(Ordering::SeqCst);
	assert!(seen >= 1);

	// no further cycles after the task has stopped
	tokio::time::sleep(Duration::from_millis(60)).await;
	assert_eq!(calls.load(Ordering::SeqCst), seen);
}

#[tokio::test]
async fn test_zero_interval_disables_polling() {
	let mut api = MockSafeApi::new();
	api.expect_fetch_all()
		.returning(|| Ok(FetchAllResult::default()));
	api.expect_fetch_latest().never();

	let mut notifier = MockNotifier::new();
	notifier.expect_send().never();

	let mut watcher = build_default_watcher(api, notifier);
	watcher.start().await.unwrap();
	let handle = watcher.spawn(Duration::ZERO);
	handle.join().await;
}
