//! Utility modules for shared functionality.

mod logging;
pub mod metrics;

pub use logging::setup_logging;
