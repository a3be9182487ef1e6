//! Secondary index maintenance.
//!
//! One implementation, reused by every entity kind, so a status change can
//! never forget to delete its old index key. Entries are marker-only:
//! the presence of `<index><SEP><dims…><SEP><primary>` is the information,
//! and every enumeration re-fetches the primary entity, which keeps a
//! stale denormalized copy from ever being served.
//!
//! Indices are derived, disposable projections — never the system of
//! record. Both halves of a re-key happen inside the same transaction, so
//! either both commit or neither does.

use registrar_ledger::key::{INDEX_MARKER, composite_key, composite_prefix, split_key};
use registrar_ledger::store::{LedgerStore, PagedScan};

use crate::error::RegistrarError;

pub const STUDENT_BY_DEPARTMENT: &str = "student.dept";
pub const STUDENT_BY_YEAR: &str = "student.year";
pub const STUDENT_BY_STATUS: &str = "student.status";
pub const RECORD_BY_STUDENT: &str = "record.student";
pub const RECORD_BY_SEMESTER: &str = "record.semester";
pub const RECORD_BY_STATUS: &str = "record.status";
pub const RECORD_BY_DEPARTMENT: &str = "record.dept";
pub const CERTIFICATE_BY_STUDENT: &str = "cert.student";

/// Insert a marker entry for `primary` under the given dimensions.
pub fn insert(
    store: &mut dyn LedgerStore,
    index: &str,
    dims: &[&str],
    primary: &str,
) -> Result<(), RegistrarError> {
    let mut parts: Vec<&str> = dims.to_vec();
    parts.push(primary);
    let key = composite_key(index, &parts)?;
    store.put(&key, INDEX_MARKER.to_vec())?;
    Ok(())
}

/// Delete the marker entry for `primary` under the given dimensions.
/// Deleting an entry that was never written is a no-op.
pub fn remove(
    store: &mut dyn LedgerStore,
    index: &str,
    dims: &[&str],
    primary: &str,
) -> Result<(), RegistrarError> {
    let mut parts: Vec<&str> = dims.to_vec();
    parts.push(primary);
    let key = composite_key(index, &parts)?;
    store.delete(&key)?;
    Ok(())
}

/// Move `primary` from one dimension combination to another. With
/// `old_dims = None` this is a plain insert (entity creation).
pub fn reindex(
    store: &mut dyn LedgerStore,
    index: &str,
    old_dims: Option<&[&str]>,
    new_dims: &[&str],
    primary: &str,
) -> Result<(), RegistrarError> {
    if let Some(old) = old_dims {
        remove(store, index, old, primary)?;
    }
    insert(store, index, new_dims, primary)
}

/// One page of index entries under the given dimension prefix.
pub fn scan_page(
    store: &dyn LedgerStore,
    index: &str,
    dims: &[&str],
    page_size: usize,
    cursor: &str,
) -> Result<PagedScan, RegistrarError> {
    let prefix = composite_prefix(index, dims)?;
    Ok(store.paged_range_by_prefix(&prefix, page_size, cursor)?)
}

/// Every primary key under the given dimension prefix, unpaginated.
pub fn all_primaries(
    store: &dyn LedgerStore,
    index: &str,
    dims: &[&str],
) -> Result<Vec<String>, RegistrarError> {
    let prefix = composite_prefix(index, dims)?;
    let entries = store.range_by_prefix(&prefix)?;
    Ok(entries
        .iter()
        .filter_map(|(key, _)| primary_key(key).map(String::from))
        .collect())
}

/// The primary key component of a composite index key (its last part).
pub fn primary_key(key: &str) -> Option<&str> {
    let parts = split_key(key);
    // index name + at least one dimension + the primary key
    if parts.len() < 3 {
        return None;
    }
    parts.last().copied()
}
