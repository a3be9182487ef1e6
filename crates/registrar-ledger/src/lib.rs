//! # registrar-ledger
//!
//! Collaborator seams for the registrar contract.
//!
//! This crate provides:
//! - `LedgerStore` (the versioned key→bytes ledger surface)
//! - composite secondary-key construction (`key`)
//! - `MemoryLedger` (deterministic in-memory reference implementation)
//! - `Caller`, `EventSink`, and `TxContext` (identity, clock, events)
//!
//! It intentionally does not implement consensus, replication, or a wire
//! protocol. Those concerns live outside the contract; every operation in
//! `registrar-core` sees only the surfaces defined here, threaded through
//! an explicit `TxContext`.
//!
//! ## Transaction model
//!
//! ```text
//! TxContext (caller + tx clock + store + event sink)
//!     ↕  one atomic, serializable transaction
//! LedgerStore (snapshot reads, buffered writes, commit-time conflicts)
//! ```

pub mod context;
pub mod key;
pub mod memory;
pub mod store;

pub use context::{Caller, EventSink, RecordingSink, TxContext};
pub use key::{INDEX_MARKER, KEY_SEPARATOR, KeyError, composite_key, composite_prefix, split_key};
pub use memory::MemoryLedger;
pub use store::{LedgerError, LedgerStore, PagedScan};
