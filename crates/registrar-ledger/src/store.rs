//! The ledger store surface.
//!
//! A `LedgerStore` is the shared, versioned key→bytes store every contract
//! operation reads and writes. All calls happen inside one atomic
//! transaction: reads observe a consistent snapshot, writes are buffered,
//! and the surrounding commit service detects read/write conflicts between
//! concurrent transactions. A conflicting transaction fails at commit with
//! `LedgerError::CommitConflict` and is safe to resubmit unchanged.

/// One page of a prefix scan.
#[derive(Debug, Clone, Default)]
pub struct PagedScan {
    /// The (key, value) entries served on this page, in key order.
    pub entries: Vec<(String, Vec<u8>)>,

    /// Opaque continuation cursor. Empty means the scan is exhausted;
    /// otherwise pass it back verbatim to resume after the last entry.
    pub next_cursor: String,

    /// How many index entries the scan actually fetched for this page.
    pub fetched_count: usize,
}

/// Errors raised by the ledger collaborator.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The backing store failed to read or write.
    #[error("ledger backend failure: {0}")]
    Backend(String),

    /// Optimistic concurrency detected a read/write conflict at commit.
    /// The transaction left no state behind and may be resubmitted as-is.
    #[error("transaction conflicts with a concurrent commit; resubmit")]
    CommitConflict,

    /// A continuation cursor does not belong to the scan it was passed to.
    #[error("invalid continuation cursor: {0}")]
    InvalidCursor(String),
}

/// The versioned key→bytes ledger, scoped to one transaction.
///
/// Keys are UTF-8 strings; composite secondary keys are built with the
/// helpers in [`crate::key`]. Iteration order is lexical by key, which is
/// what makes prefix-bounded scans over composite keys well-defined.
pub trait LedgerStore {
    /// Read one key. `Ok(None)` means the key is absent (not an error).
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write one key. Overwrites silently; uniqueness is the caller's check.
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Delete one key. Deleting an absent key is a no-op.
    fn delete(&mut self, key: &str) -> Result<(), LedgerError>;

    /// All entries whose key starts with `prefix`, in key order.
    fn range_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// One page of entries whose key starts with `prefix`, resuming after
    /// `cursor` (empty cursor starts from the beginning of the prefix).
    fn paged_range_by_prefix(
        &self,
        prefix: &str,
        page_size: usize,
        cursor: &str,
    ) -> Result<PagedScan, LedgerError>;
}
