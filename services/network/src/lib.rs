//! # Swapnet Network Service
//!
//! The orchestrating actor of the exchange. It accepts a trader's
//! deposit tagged with a trade memo, fans a rate request out to every
//! reserve bound to the traded token, picks the best quote, settles at
//! the winning reserve, and verifies that the promised destination
//! amount actually reached the receiver. Any failed check aborts the
//! trade as a whole: the ledger journal rolls every balance back and the
//! involved reserves are compensated for their local state.
//!
//! The trade itself is modeled as an explicit state machine
//! ([`TradeSaga`]) the engine drives; see [`saga`] for the phases.

pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod saga;

pub use config::{ConfigError, EngineConfig};
pub use engine::NetworkEngine;
pub use error::{NetworkError, RegistryError};
pub use registry::{ReserveRegistry, TokenBinding, MAX_RESERVES_PER_TOKEN};
pub use saga::{TradeEvent, TradeIntent, TradeReceipt, TradeSaga};
