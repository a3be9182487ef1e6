//! Deterministic in-memory ledger.
//!
//! `MemoryLedger` is the reference `LedgerStore`: a `BTreeMap` so key order
//! matches the lexical order a production ledger guarantees, with resumable
//! cursor pagination. It backs every contract test; it performs no conflict
//! detection of its own (a single test thread never conflicts).

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::store::{LedgerError, LedgerStore, PagedScan};

/// In-memory key→bytes store with lexically ordered iteration.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of live keys, secondary index entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LedgerStore for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), LedgerError> {
        self.entries.remove(key);
        Ok(())
    }

    fn range_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let mut out = Vec::new();
        for (key, value) in self.entries.range::<String, _>(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.clone(), value.clone()));
        }
        Ok(out)
    }

    fn paged_range_by_prefix(
        &self,
        prefix: &str,
        page_size: usize,
        cursor: &str,
    ) -> Result<PagedScan, LedgerError> {
        // A cursor is the last key served; it must still belong to the scan.
        if !cursor.is_empty() && !cursor.starts_with(prefix) {
            return Err(LedgerError::InvalidCursor(cursor.to_string()));
        }

        let start = if cursor.is_empty() {
            Bound::Included(prefix.to_string())
        } else {
            Bound::Excluded(cursor.to_string())
        };

        let mut entries = Vec::new();
        let mut more = false;
        for (key, value) in self.entries.range((start, Bound::Unbounded)) {
            if !key.starts_with(prefix) {
                break;
            }
            if entries.len() == page_size {
                more = true;
                break;
            }
            entries.push((key.clone(), value.clone()));
        }

        let next_cursor = if more {
            entries
                .last()
                .map(|(key, _)| key.clone())
                .unwrap_or_default()
        } else {
            String::new()
        };
        let fetched_count = entries.len();

        Ok(PagedScan {
            entries,
            next_cursor,
            fetched_count,
        })
    }
}
