//! # registrar-core
//!
//! The academic-records registrar contract: student lifecycle, semester
//! grading with SGPA/CGPA, and certificate issuance and verification,
//! executed over an append-oriented versioned ledger.
//!
//! Every operation takes an explicit [`TxContext`] carrying the caller's
//! identity, the transaction clock, the ledger surface, and the event
//! sink. There is no ambient state: two contexts over the same ledger
//! content produce identical results.
//!
//! ## Architecture
//!
//! ```text
//! student / record / certificate   ← entity operations (validate, gate,
//!     │                              mutate, index, emit)
//! query                            ← paginated index scans
//!     │
//! policy                           ← organization + department gates
//! grading                          ← SGPA / CGPA arithmetic
//! validate                         ← field format and range checks
//!     │
//! index                            ← marker-only secondary indices
//! storage                          ← JSON (de)serialization at the keys
//!     │
//! registrar_ledger::LedgerStore    ← versioned key→bytes ledger
//! ```
//!
//! Entities are the system of record; indices are derived projections and
//! every query re-fetches the primary entity before returning it.

pub mod certificate;
pub mod error;
pub mod events;
pub mod grading;
pub mod index;
pub mod model;
pub mod policy;
pub mod query;
pub mod record;
pub mod student;
pub mod validate;

pub(crate) mod storage;

pub use registrar_ledger::{Caller, EventSink, MemoryLedger, RecordingSink, TxContext};

pub use certificate::{
    certificates_by_student, document_digest, get_certificate, issue_certificate,
    revoke_certificate, verify_certificate,
};
pub use error::RegistrarError;
pub use grading::{cgpa, sgpa};
pub use model::{
    AcademicRecord, Certificate, CertificateType, Course, Grade, RecordStatus, Student,
    StudentStatus,
};
pub use policy::{ATTR_DEPARTMENT, ORG_DEPARTMENTS, ORG_REGISTRAR, ORG_VERIFIERS};
pub use query::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PagedResult, pending_records,
    records_by_semester, records_by_status, students_by_department, students_by_status,
    students_by_year,
};
pub use record::{
    NewRecord, approve_academic_record, create_academic_record, get_academic_record,
    student_history,
};
pub use student::{
    NewStudent, change_student_status, create_student, get_student, student_exists,
    update_contact_info,
};
