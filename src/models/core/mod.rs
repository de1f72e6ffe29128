mod address;
mod event;
mod transaction;

pub use address::parse_prefixed_address;
pub use event::{Event, EventType};
pub use transaction::{ListedSafeTx, SafeTx, Signer};
