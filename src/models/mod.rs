//! Domain models and data structures.
//!
//! Canonical transaction shapes shared by both upstream APIs, the event model
//! emitted by the watcher, and the service configuration.

mod config;
mod core;

pub use config::{ApiMode, Config, ConfigError};
pub use core::{parse_prefixed_address, Event, EventType, ListedSafeTx, SafeTx, Signer};
