mod error;
mod watcher_config;

pub use error::ConfigError;
pub use watcher_config::{ApiMode, Config};
