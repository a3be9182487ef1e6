//! Ledger entities and their closed status vocabularies.
//!
//! Statuses, grades, and certificate types are tagged variants, not
//! strings: an entity deserialized from the ledger is already known to
//! carry a legal value, and every consumption site matches exhaustively.
//! `parse` exists for the boundary where wire strings enter the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistrarError;

/// Lifecycle status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Graduated,
    Withdrawn,
    Cancelled,
    TemporaryWithdrawal,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Graduated => "GRADUATED",
            Self::Withdrawn => "WITHDRAWN",
            Self::Cancelled => "CANCELLED",
            Self::TemporaryWithdrawal => "TEMPORARY_WITHDRAWAL",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RegistrarError> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "GRADUATED" => Ok(Self::Graduated),
            "WITHDRAWN" => Ok(Self::Withdrawn),
            "CANCELLED" => Ok(Self::Cancelled),
            "TEMPORARY_WITHDRAWAL" => Ok(Self::TemporaryWithdrawal),
            other => Err(RegistrarError::Format(format!(
                "invalid student status '{other}'"
            ))),
        }
    }
}

/// Workflow status of an academic record.
///
/// `Submitted` has no producing operation in this contract; it is honored
/// as a legal approval pre-state for records written by earlier revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Draft,
    Submitted,
    Approved,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RegistrarError> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            "APPROVED" => Ok(Self::Approved),
            other => Err(RegistrarError::Format(format!(
                "invalid record status '{other}' (must be DRAFT, SUBMITTED, or APPROVED)"
            ))),
        }
    }
}

/// Grade symbols on the 10-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    P,
    U,
    R,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::P => "P",
            Self::U => "U",
            Self::R => "R",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RegistrarError> {
        match s {
            "S" => Ok(Self::S),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "P" => Ok(Self::P),
            "U" => Ok(Self::U),
            "R" => Ok(Self::R),
            other => Err(RegistrarError::Format(format!(
                "invalid grade '{other}' (valid grades: S, A, B, C, D, P, U, R)"
            ))),
        }
    }
}

/// Kinds of certificates the registrar issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateType {
    Degree,
    Transcript,
    Provisional,
    Bonafide,
    Migration,
    Character,
    StudyConduct,
}

impl CertificateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degree => "DEGREE",
            Self::Transcript => "TRANSCRIPT",
            Self::Provisional => "PROVISIONAL",
            Self::Bonafide => "BONAFIDE",
            Self::Migration => "MIGRATION",
            Self::Character => "CHARACTER",
            Self::StudyConduct => "STUDY_CONDUCT",
        }
    }

    pub fn parse(s: &str) -> Result<Self, RegistrarError> {
        match s {
            "DEGREE" => Ok(Self::Degree),
            "TRANSCRIPT" => Ok(Self::Transcript),
            "PROVISIONAL" => Ok(Self::Provisional),
            "BONAFIDE" => Ok(Self::Bonafide),
            "MIGRATION" => Ok(Self::Migration),
            "CHARACTER" => Ok(Self::Character),
            "STUDY_CONDUCT" => Ok(Self::StudyConduct),
            other => Err(RegistrarError::Format(format!(
                "invalid certificate type '{other}'"
            ))),
        }
    }
}

/// A student. The roll number is the primary ledger key; it is globally
/// unique and immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub roll_number: String,
    pub name: String,
    pub department: String,
    pub enrollment_year: i32,
    /// Institutional email, constrained to the student domain.
    pub email: String,
    /// Optional, modifiable through the contact-info patch.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub personal_email: String,
    /// One-way hash of the national identity number; the number itself
    /// never reaches the ledger.
    pub national_id_hash: String,
    pub admission_category: String,
    pub status: StudentStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: String,
    pub modified_at: DateTime<Utc>,
}

/// One course inside an academic record. Not independently addressable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_code: String,
    pub course_name: String,
    pub credits: f64,
    pub grade: Grade,
    pub faculty_id: String,
}

/// A per-semester academic record.
///
/// SGPA is fixed at creation and never recomputed. CGPA is 0 until the
/// record is approved, at which point it is recomputed over the student's
/// full approved history up to this record's semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicRecord {
    pub record_id: String,
    pub student_id: String,
    pub department: String,
    pub semester: u8,
    pub courses: Vec<Course>,
    pub total_credits: f64,
    pub sgpa: f64,
    pub cgpa: f64,
    pub status: RecordStatus,
    pub submitted_by: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub approved_by: String,
    pub timestamp: DateTime<Utc>,
}

/// An issued certificate. The document itself lives in external storage;
/// the ledger holds its digest and a content locator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub certificate_id: String,
    pub student_id: String,
    pub certificate_type: CertificateType,
    pub issue_date: DateTime<Utc>,
    /// Populated only for BONAFIDE: six months after issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Hex-encoded SHA-256 of the certificate document bytes.
    pub document_hash: String,
    /// External-storage content locator for the document.
    pub storage_ref: String,
    pub issued_by: String,
    pub verified: bool,
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub revoked_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub revocation_reason: String,
}
