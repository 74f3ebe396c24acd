//! # Swapnet Reserve Service
//!
//! A reserve is the liquidity-providing actor of the exchange: it owns
//! curve parameters and a fee accumulator, answers rate queries for its
//! one token pair, and pays out the destination leg when the network
//! commands a settlement.
//!
//! The crate has two layers:
//!
//! - [`Reserve`], the synchronous core: admin surface, quoting, and
//!   settlement, fully unit-testable without a runtime.
//! - [`actor`], the tokio wrapper: a spawned task draining an mpsc
//!   mailbox of [`actor::ReserveCommand`]s, addressed through a cloneable
//!   [`ReserveHandle`]. In-order mailbox delivery is what lets the
//!   orchestrator rely on quote-before-settle ordering.
//!
//! Quoting never fails: a reserve that is unconfigured, disabled, out of
//! bounds, or short of destination liquidity abstains with `None` and
//! the orchestrator simply skips it.

pub mod actor;
pub mod error;
pub mod reserve;
pub mod state;

pub use actor::{spawn, ReserveCommand, ReserveHandle};
pub use error::ReserveError;
pub use reserve::{Reserve, Settlement};
pub use state::ReserveConfig;
