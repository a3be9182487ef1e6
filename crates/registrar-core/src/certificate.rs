//! Certificate registry: issuance, verification, expiry, revocation.
//!
//! Trust is anchored in the stored SHA-256 digest and the revocation
//! record, not in who asks: verification and reads are unrestricted.
//! A revoked certificate never verifies again; an expired BONAFIDE
//! reports unverified without being marked revoked.

use chrono::Months;
use sha2::{Digest, Sha256};

use registrar_ledger::{LedgerStore, TxContext};

use crate::error::RegistrarError;
use crate::events::{self, CERTIFICATE_ISSUED, CERTIFICATE_REVOKED};
use crate::index;
use crate::model::{Certificate, CertificateType};
use crate::policy::{ORG_REGISTRAR, require_organization};
use crate::storage::{get_json, put_json};
use crate::student;
use crate::validate;

/// BONAFIDE validity window after issue.
const BONAFIDE_VALIDITY_MONTHS: u32 = 6;

/// Hex-encoded SHA-256 of a certificate document.
pub fn document_digest(document: &[u8]) -> String {
    let hash = Sha256::digest(document);
    format!("{hash:x}")
}

fn fetch(store: &dyn LedgerStore, certificate_id: &str) -> Result<Certificate, RegistrarError> {
    get_json(store, certificate_id)?.ok_or_else(|| RegistrarError::NotFound {
        kind: "certificate",
        id: certificate_id.to_string(),
    })
}

fn is_expired(certificate: &Certificate, now: chrono::DateTime<chrono::Utc>) -> bool {
    certificate.certificate_type == CertificateType::Bonafide
        && certificate
            .expiry_date
            .is_some_and(|expiry| now > expiry)
}

/// Issue a certificate over the supplied document bytes. Registrar only.
pub fn issue_certificate(
    ctx: &mut TxContext<'_>,
    certificate_id: &str,
    student_id: &str,
    certificate_type: CertificateType,
    document: &[u8],
    storage_ref: &str,
) -> Result<(), RegistrarError> {
    require_organization(&ctx.caller, &[ORG_REGISTRAR])?;

    if ctx.store.get(certificate_id)?.is_some() {
        return Err(RegistrarError::Conflict(format!(
            "certificate {certificate_id} already exists"
        )));
    }
    if !student::exists(&*ctx.store, student_id)? {
        return Err(RegistrarError::NotFound {
            kind: "student",
            id: student_id.to_string(),
        });
    }

    let expiry_date = match certificate_type {
        CertificateType::Bonafide => Some(
            ctx.tx_time
                .checked_add_months(Months::new(BONAFIDE_VALIDITY_MONTHS))
                .ok_or_else(|| RegistrarError::Storage("expiry date overflows".into()))?,
        ),
        _ => None,
    };

    let certificate = Certificate {
        certificate_id: certificate_id.to_string(),
        student_id: student_id.to_string(),
        certificate_type,
        issue_date: ctx.tx_time,
        expiry_date,
        document_hash: document_digest(document),
        storage_ref: storage_ref.to_string(),
        issued_by: ctx.caller.unique_id().to_string(),
        verified: true,
        revoked: false,
        revoked_by: String::new(),
        revoked_at: None,
        revocation_reason: String::new(),
    };

    put_json(ctx.store, certificate_id, &certificate)?;
    index::insert(
        ctx.store,
        index::CERTIFICATE_BY_STUDENT,
        &[student_id],
        certificate_id,
    )?;

    let payload = events::CertificateIssued {
        certificate_id,
        student_id,
        certificate_type,
        issued_by: &certificate.issued_by,
        issue_date: certificate.issue_date,
        expiry_date: certificate.expiry_date,
    };
    events::emit(ctx, CERTIFICATE_ISSUED, &payload)
}

/// Read one certificate. Unrestricted.
///
/// An expired BONAFIDE is reported with `verified = false`; the flip is
/// transient and never written back.
pub fn get_certificate(
    ctx: &TxContext<'_>,
    certificate_id: &str,
) -> Result<Certificate, RegistrarError> {
    let mut certificate = fetch(&*ctx.store, certificate_id)?;
    if is_expired(&certificate, ctx.tx_time) {
        certificate.verified = false;
    }
    Ok(certificate)
}

/// Verify the supplied document bytes against the stored digest.
///
/// Revocation and BONAFIDE expiry fail as distinct errors; a digest
/// mismatch is `Ok(false)`, not an error.
pub fn verify_certificate(
    ctx: &TxContext<'_>,
    certificate_id: &str,
    document: &[u8],
) -> Result<bool, RegistrarError> {
    let certificate = fetch(&*ctx.store, certificate_id)?;

    if certificate.revoked {
        return Err(RegistrarError::Revoked {
            reason: certificate.revocation_reason,
        });
    }
    if is_expired(&certificate, ctx.tx_time) {
        let expired_on = certificate
            .expiry_date
            .map(|expiry| expiry.date_naive())
            .unwrap_or_else(|| ctx.tx_time.date_naive());
        return Err(RegistrarError::Expired { expired_on });
    }

    Ok(document_digest(document) == certificate.document_hash)
}

/// Revoke a certificate permanently. Registrar only; the reason must
/// carry enough text to stand alone in an audit trail.
pub fn revoke_certificate(
    ctx: &mut TxContext<'_>,
    certificate_id: &str,
    reason: &str,
) -> Result<(), RegistrarError> {
    require_organization(&ctx.caller, &[ORG_REGISTRAR])?;

    let mut certificate = fetch(&*ctx.store, certificate_id)?;
    if certificate.revoked {
        return Err(RegistrarError::Conflict(format!(
            "certificate {certificate_id} is already revoked"
        )));
    }
    validate::validate_revocation_reason(reason)?;

    certificate.revoked = true;
    certificate.revoked_by = ctx.caller.unique_id().to_string();
    certificate.revoked_at = Some(ctx.tx_time);
    certificate.revocation_reason = reason.to_string();
    certificate.verified = false;

    put_json(ctx.store, certificate_id, &certificate)?;

    let payload = events::CertificateRevoked {
        certificate_id,
        student_id: &certificate.student_id,
        certificate_type: certificate.certificate_type,
        revoked_by: &certificate.revoked_by,
        revoked_at: ctx.tx_time,
        reason,
    };
    events::emit(ctx, CERTIFICATE_REVOKED, &payload)
}

/// Every certificate issued to one student. Unrestricted.
pub fn certificates_by_student(
    ctx: &TxContext<'_>,
    student_id: &str,
) -> Result<Vec<Certificate>, RegistrarError> {
    let mut certificates = Vec::new();
    for certificate_id in
        index::all_primaries(&*ctx.store, index::CERTIFICATE_BY_STUDENT, &[student_id])?
    {
        if let Some(certificate) = get_json::<Certificate>(&*ctx.store, &certificate_id)? {
            certificates.push(certificate);
        }
    }
    Ok(certificates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use registrar_ledger::{Caller, MemoryLedger, RecordingSink, TxContext};

    use crate::policy::ORG_VERIFIERS;
    use crate::student::{NewStudent, create_student};

    const DOC: &[u8] = b"%PDF-1.7 bonafide certificate of CS21B001";

    fn registrar() -> Caller {
        Caller::new(ORG_REGISTRAR, "x509::registrar-clerk")
    }

    fn issue_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).single().expect("issue time")
    }

    fn tx_at<'a>(
        caller: Caller,
        tx_time: DateTime<Utc>,
        ledger: &'a mut MemoryLedger,
        sink: &'a mut RecordingSink,
    ) -> TxContext<'a> {
        TxContext::new(caller, tx_time, ledger, sink)
    }

    fn seed(ledger: &mut MemoryLedger, sink: &mut RecordingSink, certificate_type: CertificateType) {
        let mut ctx = tx_at(registrar(), issue_time(), ledger, sink);
        create_student(
            &mut ctx,
            NewStudent {
                roll_number: "CS21B001".to_string(),
                name: "Asha Rao".to_string(),
                department: "CSE".to_string(),
                enrollment_year: 2021,
                email: "cs21b001@student.nitw.ac.in".to_string(),
                national_id_hash: "a".repeat(64),
                admission_category: "GEN".to_string(),
            },
        )
        .expect("seed student");
        issue_certificate(&mut ctx, "CERT-1", "CS21B001", certificate_type, DOC, "ipfs://Qm1")
            .expect("issue");
    }

    #[test]
    fn verification_is_a_digest_match_open_to_anyone() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        seed(&mut ledger, &mut sink, CertificateType::Degree);

        let verifier = Caller::new(ORG_VERIFIERS, "x509::employer");
        let ctx = tx_at(verifier, issue_time(), &mut ledger, &mut sink);
        assert!(verify_certificate(&ctx, "CERT-1", DOC).expect("verify"));
        assert!(!verify_certificate(&ctx, "CERT-1", b"tampered").expect("verify mismatch"));
    }

    #[test]
    fn bonafide_expires_after_six_months() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        seed(&mut ledger, &mut sink, CertificateType::Bonafide);

        let five_months = issue_time() + Months::new(5);
        let ctx = tx_at(registrar(), five_months, &mut ledger, &mut sink);
        assert!(verify_certificate(&ctx, "CERT-1", DOC).expect("still valid"));
        drop(ctx);

        let seven_months = issue_time() + Months::new(7);
        let ctx = tx_at(registrar(), seven_months, &mut ledger, &mut sink);
        let err = verify_certificate(&ctx, "CERT-1", DOC).expect_err("expired");
        assert!(matches!(err, RegistrarError::Expired { .. }));

        // The read surface flips verified only transiently.
        let read = get_certificate(&ctx, "CERT-1").expect("read");
        assert!(!read.verified);
        assert!(!read.revoked);
        drop(ctx);

        let ctx = tx_at(registrar(), five_months, &mut ledger, &mut sink);
        let fresh = get_certificate(&ctx, "CERT-1").expect("read before expiry");
        assert!(fresh.verified);
    }

    #[test]
    fn non_bonafide_never_expires() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        seed(&mut ledger, &mut sink, CertificateType::Transcript);

        let decades_later = Utc.with_ymd_and_hms(2060, 1, 1, 0, 0, 0).single().expect("time");
        let ctx = tx_at(registrar(), decades_later, &mut ledger, &mut sink);
        assert!(verify_certificate(&ctx, "CERT-1", DOC).expect("ageless"));
        let read = get_certificate(&ctx, "CERT-1").expect("read");
        assert!(read.verified);
        assert!(read.expiry_date.is_none());
    }

    #[test]
    fn revocation_is_permanent_and_idempotently_rejected() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        seed(&mut ledger, &mut sink, CertificateType::Degree);

        let mut ctx = tx_at(registrar(), issue_time(), &mut ledger, &mut sink);
        let err = revoke_certificate(&mut ctx, "CERT-1", "too short")
            .expect_err("reason under 10 characters");
        assert!(matches!(err, RegistrarError::Range(_)));

        revoke_certificate(&mut ctx, "CERT-1", "degree rescinded after inquiry")
            .expect("revoke");

        // Even the exact original bytes never verify again.
        let err = verify_certificate(&ctx, "CERT-1", DOC).expect_err("revoked");
        match err {
            RegistrarError::Revoked { reason } => {
                assert_eq!(reason, "degree rescinded after inquiry");
            }
            other => panic!("expected Revoked, got {other:?}"),
        }

        let err = revoke_certificate(&mut ctx, "CERT-1", "revoking a second time")
            .expect_err("double revocation");
        assert!(matches!(err, RegistrarError::Conflict(_)));
    }

    #[test]
    fn duplicate_id_and_missing_student_are_rejected() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        seed(&mut ledger, &mut sink, CertificateType::Degree);

        let mut ctx = tx_at(registrar(), issue_time(), &mut ledger, &mut sink);
        let err = issue_certificate(
            &mut ctx,
            "CERT-1",
            "CS21B001",
            CertificateType::Degree,
            DOC,
            "ipfs://Qm1",
        )
        .expect_err("duplicate id");
        assert!(matches!(err, RegistrarError::Conflict(_)));

        let err = issue_certificate(
            &mut ctx,
            "CERT-2",
            "EC21B999",
            CertificateType::Degree,
            DOC,
            "ipfs://Qm2",
        )
        .expect_err("unknown student");
        assert!(matches!(err, RegistrarError::NotFound { kind: "student", .. }));
    }

    #[test]
    fn listing_returns_every_certificate_for_the_student() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        seed(&mut ledger, &mut sink, CertificateType::Degree);

        let mut ctx = tx_at(registrar(), issue_time(), &mut ledger, &mut sink);
        issue_certificate(
            &mut ctx,
            "CERT-2",
            "CS21B001",
            CertificateType::Bonafide,
            DOC,
            "ipfs://Qm2",
        )
        .expect("second certificate");

        let certificates = certificates_by_student(&ctx, "CS21B001").expect("list");
        assert_eq!(certificates.len(), 2);
    }
}
