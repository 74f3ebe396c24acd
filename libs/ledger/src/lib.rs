//! # Swapnet Ledger Library
//!
//! The protocol's external-collaborator seams, as traits, plus an
//! in-memory implementation suitable for embedding and tests.
//!
//! The hosting platform the protocol was designed for provides atomic
//! whole-transaction rollback for free; a generic host does not. The
//! [`InMemoryLedger`] therefore carries an explicit journal: the trade
//! engine brackets each trade in `begin`/`commit`, and `rollback`
//! restores every balance the trade touched, in reverse order. That
//! journal is the saga's undo log.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{AuthError, LedgerError};
pub use memory::{InMemoryLedger, LedgerHandle};
pub use traits::{Authorizer, Ledger, SelfAuthorizer};
