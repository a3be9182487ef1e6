//! Audit events published by contract operations.
//!
//! Events are serialized with serde_json and handed to the transaction's
//! sink before the operation returns success. Delivery is best-effort and
//! never awaited; the ledger write, not the event, is the system of
//! record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use registrar_ledger::TxContext;

use crate::error::RegistrarError;
use crate::model::{CertificateType, RecordStatus, StudentStatus};

pub const STUDENT_CREATED: &str = "StudentCreated";
pub const STUDENT_STATUS_CHANGED: &str = "StudentStatusChanged";
pub const RECORD_CREATED: &str = "RecordCreated";
pub const RECORD_APPROVED: &str = "RecordApproved";
pub const CERTIFICATE_ISSUED: &str = "CertificateIssued";
pub const CERTIFICATE_REVOKED: &str = "CertificateRevoked";

/// Serialize a payload and hand it to the sink.
pub(crate) fn emit<T: Serialize>(
    ctx: &mut TxContext<'_>,
    name: &str,
    payload: &T,
) -> Result<(), RegistrarError> {
    let bytes = serde_json::to_vec(payload)?;
    ctx.events.publish(name, &bytes);
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreated<'a> {
    pub roll_number: &'a str,
    pub name: &'a str,
    pub department: &'a str,
    pub enrollment_year: i32,
    pub created_by: &'a str,
    pub created_at: DateTime<Utc>,
}

/// The change-of-status audit trail. The reason lives here, not on the
/// student entity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatusChanged<'a> {
    pub roll_number: &'a str,
    pub old_status: StudentStatus,
    pub new_status: StudentStatus,
    pub reason: &'a str,
    pub modified_by: &'a str,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCreated<'a> {
    pub record_id: &'a str,
    pub roll_number: &'a str,
    pub semester: u8,
    pub department: &'a str,
    pub courses_count: usize,
    pub total_credits: f64,
    pub sgpa: f64,
    pub status: RecordStatus,
    pub submitted_by: &'a str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordApproved<'a> {
    pub record_id: &'a str,
    pub student_id: &'a str,
    pub semester: u8,
    pub department: &'a str,
    pub sgpa: f64,
    pub cgpa: f64,
    pub approved_by: &'a str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateIssued<'a> {
    pub certificate_id: &'a str,
    pub student_id: &'a str,
    pub certificate_type: CertificateType,
    pub issued_by: &'a str,
    pub issue_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRevoked<'a> {
    pub certificate_id: &'a str,
    pub student_id: &'a str,
    pub certificate_type: CertificateType,
    pub revoked_by: &'a str,
    pub revoked_at: DateTime<Utc>,
    pub reason: &'a str,
}
