//! Prefixed Safe address parsing.
//!
//! Watched wallets are identified as `prefix:0x<address>`, e.g.
//! `eth:0x1234...`, where the prefix selects the chain.

use crate::models::config::ConfigError;

/// Splits a `prefix:0x...` identifier into its chain prefix and address.
///
/// The address must be a 20-byte hex string with `0x` prefix; the chain
/// prefix must be non-empty alphanumeric (dashes allowed).
pub fn parse_prefixed_address(addr: &str) -> Result<(String, String), ConfigError> {
	let invalid =
		|| ConfigError::validation_error(format!("invalid prefixed safe address '{}'", addr));

	let (prefix, address) = addr.split_once(':').ok_or_else(invalid)?;
	if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
		return Err(invalid());
	}
	let hex = address.strip_prefix("0x").ok_or_else(invalid)?;
	if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(invalid());
	}
	Ok((prefix.to_string(), address.to_string()))
}
