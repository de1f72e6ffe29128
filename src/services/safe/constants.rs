//! Known-safe delegate-call targets.

use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
	/// MultiSend call-only deployments, the only delegate-call targets that
	/// are considered benign. Addresses are lowercase.
	///
	/// See multi_send_call_only.sol in
	/// https://docs.safe.global/advanced/smart-account-supported-networks
	pub static ref MULTISEND_CALL_ONLY: HashSet<&'static str> = HashSet::from([
		"0x9641d764fc13c8b624c04430c7356c1c7c8102e2",
		"0x40a2accbd92bca938b02010e17a5b8929b49130d",
	]);
}
