//! Source adapters for the upstream Safe transaction services.

mod cached;
mod classic;
mod gateway;

pub use cached::CachedSafeApi;
pub use classic::ClassicApi;
pub use gateway::GatewayApi;

pub(crate) use classic::classic_base_url;
pub(crate) use gateway::gateway_chain_id;
