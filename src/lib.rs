//! Safe multisig transaction watcher.
//!
//! Watches Safe ("multisig") wallets by polling the upstream transaction
//! services, reconciles the observed transaction state against the previously
//! observed state, and emits classified notification events (created, updated,
//! executed, malicious) to the configured channels.
//!
//! The crate is organized as:
//! - `models`: canonical transaction shapes, events and configuration
//! - `services::safe`: the dual-source API abstraction with retry and fallback
//! - `services::watcher`: the per-wallet reconciliation loop
//! - `services::notification`: notifier fan-out and channel implementations
//! - `utils`: logging setup and the health/metrics endpoint
//! - `bootstrap`: service wiring used by the binary

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
