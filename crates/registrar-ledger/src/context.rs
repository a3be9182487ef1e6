//! Transaction context: caller identity, clock, store, event sink.
//!
//! Every contract operation takes a `TxContext` as its first parameter.
//! There is no process-wide "current caller" or "current time" — the
//! context is the only way an operation learns who is calling and what
//! the deterministic transaction timestamp is. Each participant validating
//! the same transaction sees identical values.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::store::LedgerStore;

/// The authenticated caller of a transaction.
///
/// The membership system authenticates the credential and exposes the
/// issuing organization, a unique identity string, and the signed
/// attributes embedded in the credential. The contract trusts these
/// values; it never re-verifies signatures itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    organization: String,
    unique_id: String,
    attributes: BTreeMap<String, String>,
}

impl Caller {
    pub fn new(organization: impl Into<String>, unique_id: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            unique_id: unique_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach a signed attribute claim (builder-style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The organization the caller's credential was issued under.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Stable unique identity of the caller, stamped into audit fields.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// A signed attribute claim, if present on the credential.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Fire-and-forget event publisher.
///
/// Events are published before an operation returns success but are not
/// transactionally awaited; delivery is best-effort.
pub trait EventSink {
    fn publish(&mut self, name: &str, payload: &[u8]);
}

/// Event sink that records every publish, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub published: Vec<(String, Vec<u8>)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of published events, in publish order.
    pub fn names(&self) -> Vec<&str> {
        self.published.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Payload of the most recent event with the given name.
    pub fn last_payload(&self, name: &str) -> Option<&[u8]> {
        self.published
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, payload)| payload.as_slice())
    }
}

impl EventSink for RecordingSink {
    fn publish(&mut self, name: &str, payload: &[u8]) {
        self.published.push((name.to_string(), payload.to_vec()));
    }
}

/// Everything one transaction may see and touch.
///
/// Fields are public so an operation can borrow the store mutably while
/// still reading the caller and clock.
pub struct TxContext<'a> {
    pub caller: Caller,
    /// Deterministic transaction timestamp, identical for every validator.
    pub tx_time: DateTime<Utc>,
    pub store: &'a mut dyn LedgerStore,
    pub events: &'a mut dyn EventSink,
}

impl<'a> TxContext<'a> {
    pub fn new(
        caller: Caller,
        tx_time: DateTime<Utc>,
        store: &'a mut dyn LedgerStore,
        events: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            caller,
            tx_time,
            store,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_queryable_by_name() {
        let caller = Caller::new("DepartmentsMSP", "x509::dept-clerk")
            .with_attribute("department", "CSE");
        assert_eq!(caller.attribute("department"), Some("CSE"));
        assert_eq!(caller.attribute("role"), None);
    }

    #[test]
    fn recording_sink_keeps_publish_order() {
        let mut sink = RecordingSink::new();
        sink.publish("First", b"1");
        sink.publish("Second", b"2");
        assert_eq!(sink.names(), vec!["First", "Second"]);
        assert_eq!(sink.last_payload("First"), Some(&b"1"[..]));
    }
}
