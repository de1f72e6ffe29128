//! Integration tests for the mode-driven source wrapper.

use std::sync::Arc;

use mockall::Sequence;

use safe_watcher::models::ApiMode;
use safe_watcher::services::safe::{SafeApi, SafeApiError, SafeApiWrapper};

use crate::integration::mocks::{create_test_listed_tx, MockSafeApi};

#[tokio::test]
async fn test_classic_mode_never_touches_gateway() {
	let mut classic = MockSafeApi::new();
	classic
		.expect_fetch_latest()
		.times(1)
		.returning(|| Ok(vec![]));
	// no expectations on the gateway, any call panics
	let gateway = MockSafeApi::new();

	let wrapper = SafeApiWrapper::new(Arc::new(classic), Arc::new(gateway), ApiMode::Classic);
	assert!(wrapper.fetch_latest().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_alt_mode_never_touches_classic() {
	let classic = MockSafeApi::new();
	let mut gateway = MockSafeApi::new();
	gateway
		.expect_fetch_latest()
		.times(1)
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 1, false)]));

	let wrapper = SafeApiWrapper::new(Arc::new(classic), Arc::new(gateway), ApiMode::Alt);
	assert_eq!(wrapper.fetch_latest().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fallback_uses_gateway_on_classic_failure() {
	let mut classic = MockSafeApi::new();
	classic
		.expect_fetch_latest()
		.times(1)
		.returning(|| Err(SafeApiError::network_error("classic down")));
	let mut gateway = MockSafeApi::new();
	gateway
		.expect_fetch_latest()
		.times(1)
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 1, false)]));

	let wrapper = SafeApiWrapper::new(Arc::new(classic), Arc::new(gateway), ApiMode::Fallback);
	assert_eq!(wrapper.fetch_latest().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fallback_is_not_sticky() {
	let mut seq = Sequence::new();
	let mut classic = MockSafeApi::new();
	let mut gateway = MockSafeApi::new();

	classic
		.expect_fetch_latest()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|| Err(SafeApiError::network_error("classic down")));
	gateway
		.expect_fetch_latest()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|| Ok(vec![]));
	// next cycle starts from classic again
	classic
		.expect_fetch_latest()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|| Ok(vec![create_test_listed_tx("0xa", 1, 1, false)]));

	let wrapper = SafeApiWrapper::new(Arc::new(classic), Arc::new(gateway), ApiMode::Fallback);
	assert!(wrapper.fetch_latest().await.unwrap().is_empty());
	assert_eq!(wrapper.fetch_latest().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fallback_propagates_when_both_fail() {
	let mut classic = MockSafeApi::new();
	classic
		.expect_fetch_latest()
		.returning(|| Err(SafeApiError::network_error("classic down")));
	let mut gateway = MockSafeApi::new();
	gateway
		.expect_fetch_latest()
		.returning(|| Err(SafeApiError::response_error("gateway down")));

	let wrapper = SafeApiWrapper::new(Arc::new(classic), Arc::new(gateway), ApiMode::Fallback);
	let result = wrapper.fetch_latest().await;
	assert!(matches!(result, Err(SafeApiError::ResponseError(_))));
}
