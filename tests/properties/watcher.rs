//! Properties of the reconciliation helpers.

use proptest::prelude::*;

use safe_watcher::models::{ListedSafeTx, SafeTx};
use safe_watcher::services::watcher::{is_malicious, pending_transactions};

prop_compose! {
	fn arb_listed_tx()(
		hash in "0x[a-f0-9]{8}",
		nonce in 0u64..20,
		confirmations in 0u64..5,
		confirmations_required in 1u64..5,
		is_executed in any::<bool>(),
	) -> ListedSafeTx {
		ListedSafeTx {
			safe_tx_hash: hash,
			nonce,
			confirmations,
			confirmations_required,
			is_executed,
		}
	}
}

prop_compose! {
	fn arb_detailed_tx()(
		to in "0x[a-f0-9]{40}",
		operation in 0u64..3,
	) -> SafeTx<String> {
		SafeTx {
			safe_tx_hash: "0xhash".to_string(),
			nonce: 0,
			to,
			operation,
			proposer: "0xaaa".to_string(),
			confirmations: vec![],
			confirmations_required: 1,
			is_executed: false,
		}
	}
}

proptest! {
	#[test]
	fn pending_contains_only_unexecuted(txs in proptest::collection::vec(arb_listed_tx(), 0..30)) {
		let pending = pending_transactions(&txs);
		prop_assert!(pending.iter().all(|tx| !tx.is_executed));
	}

	#[test]
	fn pending_count_matches_unexecuted_count(txs in proptest::collection::vec(arb_listed_tx(), 0..30)) {
		let pending = pending_transactions(&txs);
		let unexecuted = txs.iter().filter(|tx| !tx.is_executed).count();
		prop_assert_eq!(pending.len(), unexecuted);
	}

	#[test]
	fn pending_is_sorted_by_nonce(txs in proptest::collection::vec(arb_listed_tx(), 0..30)) {
		let pending = pending_transactions(&txs);
		prop_assert!(pending.windows(2).all(|pair| pair[0].nonce <= pair[1].nonce));
	}

	#[test]
	fn pending_preserves_listing_order_within_a_nonce(
		txs in proptest::collection::vec(arb_listed_tx(), 0..30),
	) {
		// independent oracle: listing position breaks nonce ties
		let mut expected: Vec<(usize, &ListedSafeTx)> = txs
			.iter()
			.enumerate()
			.filter(|(_, tx)| !tx.is_executed)
			.collect();
		expected.sort_by_key(|(position, tx)| (tx.nonce, *position));

		let pending = pending_transactions(&txs);
		prop_assert_eq!(pending.len(), expected.len());
		for (actual, (_, wanted)) in pending.iter().zip(&expected) {
			prop_assert_eq!(actual, *wanted);
		}
	}

	#[test]
	fn direct_calls_are_never_malicious(mut tx in arb_detailed_tx()) {
		tx.operation = 0;
		prop_assert!(!is_malicious(&tx));
	}

	#[test]
	fn maliciousness_ignores_target_case(tx in arb_detailed_tx()) {
		let mut upper = tx.clone();
		upper.to = tx.to.to_uppercase().replace("0X", "0x");
		prop_assert_eq!(is_malicious(&tx), is_malicious(&upper));
	}
}
