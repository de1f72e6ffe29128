//! Core services for watching Safe wallets.
//!
//! - `safe`: dual-source transaction API abstraction
//! - `watcher`: per-wallet reconciliation loop
//! - `notification`: event fan-out and delivery channels

pub mod notification;
pub mod safe;
pub mod watcher;
