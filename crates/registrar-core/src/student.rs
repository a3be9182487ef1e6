//! Student lifecycle: creation, status transitions, contact info.
//!
//! The status engine is a recorder, not an enforcer of a strict DAG: every
//! transition between legal statuses is accepted, but CANCELLED and
//! WITHDRAWN demand a non-empty reason, which is recorded on the audit
//! event rather than the entity.

use chrono::Datelike;

use registrar_ledger::{LedgerStore, TxContext};

use crate::error::RegistrarError;
use crate::events::{self, STUDENT_CREATED, STUDENT_STATUS_CHANGED};
use crate::index;
use crate::model::{Student, StudentStatus};
use crate::policy::{ORG_REGISTRAR, require_department_access, require_organization};
use crate::storage::{get_json, put_json};
use crate::validate;

/// Caller-supplied fields for student creation.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub department: String,
    pub enrollment_year: i32,
    pub email: String,
    /// Pre-hashed national identity number; never the number itself.
    pub national_id_hash: String,
    pub admission_category: String,
}

pub(crate) fn exists(store: &dyn LedgerStore, roll_number: &str) -> Result<bool, RegistrarError> {
    Ok(store.get(roll_number)?.is_some())
}

fn fetch(store: &dyn LedgerStore, roll_number: &str) -> Result<Student, RegistrarError> {
    get_json(store, roll_number)?.ok_or_else(|| RegistrarError::NotFound {
        kind: "student",
        id: roll_number.to_string(),
    })
}

/// Create a student. Registrar only; the roll number must be unused.
pub fn create_student(ctx: &mut TxContext<'_>, input: NewStudent) -> Result<(), RegistrarError> {
    require_organization(&ctx.caller, &[ORG_REGISTRAR])?;

    validate::validate_roll_number(&input.roll_number)?;
    validate::validate_name(&input.name)?;
    validate::validate_email(&input.email)?;
    validate::validate_enrollment_year(input.enrollment_year, ctx.tx_time.year())?;

    if exists(&*ctx.store, &input.roll_number)? {
        return Err(RegistrarError::Conflict(format!(
            "student with roll number {} already exists",
            input.roll_number
        )));
    }

    let student = Student {
        roll_number: input.roll_number,
        name: input.name,
        department: input.department,
        enrollment_year: input.enrollment_year,
        email: input.email,
        phone: String::new(),
        personal_email: String::new(),
        national_id_hash: input.national_id_hash,
        admission_category: input.admission_category,
        status: StudentStatus::Active,
        created_by: ctx.caller.unique_id().to_string(),
        created_at: ctx.tx_time,
        modified_by: ctx.caller.unique_id().to_string(),
        modified_at: ctx.tx_time,
    };

    put_json(ctx.store, &student.roll_number, &student)?;

    let year = student.enrollment_year.to_string();
    index::insert(
        ctx.store,
        index::STUDENT_BY_DEPARTMENT,
        &[&student.department],
        &student.roll_number,
    )?;
    index::insert(
        ctx.store,
        index::STUDENT_BY_YEAR,
        &[&year],
        &student.roll_number,
    )?;
    index::insert(
        ctx.store,
        index::STUDENT_BY_STATUS,
        &[student.status.as_str()],
        &student.roll_number,
    )?;

    let payload = events::StudentCreated {
        roll_number: &student.roll_number,
        name: &student.name,
        department: &student.department,
        enrollment_year: student.enrollment_year,
        created_by: &student.created_by,
        created_at: student.created_at,
    };
    events::emit(ctx, STUDENT_CREATED, &payload)
}

/// Read one student. Registrar, or the student's own department.
pub fn get_student(ctx: &TxContext<'_>, roll_number: &str) -> Result<Student, RegistrarError> {
    let student = fetch(&*ctx.store, roll_number)?;
    require_department_access(&ctx.caller, &student.department)?;
    Ok(student)
}

/// Whether a roll number is taken.
pub fn student_exists(ctx: &TxContext<'_>, roll_number: &str) -> Result<bool, RegistrarError> {
    exists(&*ctx.store, roll_number)
}

/// Change a student's lifecycle status. Registrar only. CANCELLED and
/// WITHDRAWN require a non-empty reason; the status index is re-keyed in
/// the same transaction as the primary write.
pub fn change_student_status(
    ctx: &mut TxContext<'_>,
    roll_number: &str,
    new_status: StudentStatus,
    reason: &str,
) -> Result<(), RegistrarError> {
    require_organization(&ctx.caller, &[ORG_REGISTRAR])?;

    let mut student = fetch(&*ctx.store, roll_number)?;
    let old_status = student.status;

    let needs_reason = matches!(
        new_status,
        StudentStatus::Cancelled | StudentStatus::Withdrawn
    );
    if needs_reason && reason.is_empty() {
        return Err(RegistrarError::Format(format!(
            "reason required for status change to {}",
            new_status.as_str()
        )));
    }

    student.status = new_status;
    student.modified_by = ctx.caller.unique_id().to_string();
    student.modified_at = ctx.tx_time;

    put_json(ctx.store, roll_number, &student)?;
    index::reindex(
        ctx.store,
        index::STUDENT_BY_STATUS,
        Some(&[old_status.as_str()]),
        &[new_status.as_str()],
        roll_number,
    )?;

    let payload = events::StudentStatusChanged {
        roll_number,
        old_status,
        new_status,
        reason,
        modified_by: &student.modified_by,
        modified_at: student.modified_at,
    };
    events::emit(ctx, STUDENT_STATUS_CHANGED, &payload)
}

/// Partial patch of the modifiable contact fields: only non-empty supplied
/// values overwrite, and the modifier stamp always updates.
pub fn update_contact_info(
    ctx: &mut TxContext<'_>,
    roll_number: &str,
    phone: &str,
    personal_email: &str,
) -> Result<(), RegistrarError> {
    require_organization(&ctx.caller, &[ORG_REGISTRAR])?;

    let mut student = fetch(&*ctx.store, roll_number)?;
    if !phone.is_empty() {
        student.phone = phone.to_string();
    }
    if !personal_email.is_empty() {
        student.personal_email = personal_email.to_string();
    }
    student.modified_by = ctx.caller.unique_id().to_string();
    student.modified_at = ctx.tx_time;

    put_json(ctx.store, roll_number, &student)
}
