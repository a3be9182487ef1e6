//! JSON (de)serialization of primary entities into the ledger.

use serde::Serialize;
use serde::de::DeserializeOwned;

use registrar_ledger::LedgerStore;

use crate::error::RegistrarError;

/// Read and decode one entity. `Ok(None)` means the key is absent.
pub(crate) fn get_json<T: DeserializeOwned>(
    store: &dyn LedgerStore,
    key: &str,
) -> Result<Option<T>, RegistrarError> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Encode and write one entity under its primary key.
pub(crate) fn put_json<T: Serialize>(
    store: &mut dyn LedgerStore,
    key: &str,
    value: &T,
) -> Result<(), RegistrarError> {
    let bytes = serde_json::to_vec(value)?;
    store.put(key, bytes)?;
    Ok(())
}
