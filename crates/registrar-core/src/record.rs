//! Academic record workflow: draft creation, approval, CGPA.
//!
//! A record is created as DRAFT with its SGPA fixed forever; approval is
//! the only transition, recomputes CGPA over the student's full approved
//! history, and is idempotently rejected on a second attempt. SUBMITTED is
//! accepted as an approval pre-state but nothing here produces it.
//!
//! One record per (student, semester) is a business expectation, not a
//! ledger constraint: supplementary and re-evaluation records are legal.

use registrar_ledger::{LedgerStore, TxContext};

use crate::error::RegistrarError;
use crate::events::{self, RECORD_APPROVED, RECORD_CREATED};
use crate::grading;
use crate::index;
use crate::model::{AcademicRecord, Course, RecordStatus};
use crate::policy::{ORG_REGISTRAR, require_department_access, require_organization};
use crate::storage::{get_json, put_json};
use crate::student;
use crate::validate;

/// Caller-supplied fields for record creation.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub record_id: String,
    pub roll_number: String,
    pub semester: u8,
    pub department: String,
    pub courses: Vec<Course>,
}

fn fetch(store: &dyn LedgerStore, record_id: &str) -> Result<AcademicRecord, RegistrarError> {
    get_json(store, record_id)?.ok_or_else(|| RegistrarError::NotFound {
        kind: "record",
        id: record_id.to_string(),
    })
}

/// All of a student's records, unfiltered. Used by CGPA aggregation,
/// which must see every record regardless of the caller.
pub(crate) fn load_history(
    store: &dyn LedgerStore,
    student_id: &str,
) -> Result<Vec<AcademicRecord>, RegistrarError> {
    let mut records = Vec::new();
    for record_id in index::all_primaries(store, index::RECORD_BY_STUDENT, &[student_id])? {
        // An index entry without its primary is a dangling projection; skip.
        if let Some(record) = get_json::<AcademicRecord>(store, &record_id)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Create a DRAFT record. Registrar, or the department owning the record.
pub fn create_academic_record(
    ctx: &mut TxContext<'_>,
    input: NewRecord,
) -> Result<(), RegistrarError> {
    if ctx.caller.organization() != ORG_REGISTRAR {
        require_department_access(&ctx.caller, &input.department)?;
    }

    if ctx.store.get(&input.record_id)?.is_some() {
        return Err(RegistrarError::Conflict(format!(
            "academic record {} already exists",
            input.record_id
        )));
    }
    if !student::exists(&*ctx.store, &input.roll_number)? {
        return Err(RegistrarError::NotFound {
            kind: "student",
            id: input.roll_number.clone(),
        });
    }

    validate::validate_semester(input.semester)?;
    if input.courses.is_empty() {
        return Err(RegistrarError::Format(
            "at least one course is required".into(),
        ));
    }

    let mut total_credits = 0.0;
    for course in &input.courses {
        validate::validate_course_code(&course.course_code)?;
        validate::validate_course_name(&course.course_name)?;
        validate::validate_credits(course.credits)?;
        total_credits += course.credits;
    }
    validate::validate_semester_credits(total_credits)?;

    let sgpa = grading::sgpa(&input.courses);

    let record = AcademicRecord {
        record_id: input.record_id,
        student_id: input.roll_number,
        department: input.department,
        semester: input.semester,
        courses: input.courses,
        total_credits,
        sgpa,
        cgpa: 0.0,
        status: RecordStatus::Draft,
        submitted_by: ctx.caller.unique_id().to_string(),
        approved_by: String::new(),
        timestamp: ctx.tx_time,
    };

    put_json(ctx.store, &record.record_id, &record)?;

    let semester = record.semester.to_string();
    index::insert(
        ctx.store,
        index::RECORD_BY_STUDENT,
        &[&record.student_id],
        &record.record_id,
    )?;
    index::insert(
        ctx.store,
        index::RECORD_BY_SEMESTER,
        &[&semester, &record.student_id],
        &record.record_id,
    )?;
    index::insert(
        ctx.store,
        index::RECORD_BY_STATUS,
        &[record.status.as_str(), &record.student_id],
        &record.record_id,
    )?;
    index::insert(
        ctx.store,
        index::RECORD_BY_DEPARTMENT,
        &[&record.department],
        &record.record_id,
    )?;

    let payload = events::RecordCreated {
        record_id: &record.record_id,
        roll_number: &record.student_id,
        semester: record.semester,
        department: &record.department,
        courses_count: record.courses.len(),
        total_credits: record.total_credits,
        sgpa: record.sgpa,
        status: record.status,
        submitted_by: &record.submitted_by,
        timestamp: record.timestamp,
    };
    events::emit(ctx, RECORD_CREATED, &payload)
}

/// Read one record. Registrar, or the record's own department.
pub fn get_academic_record(
    ctx: &TxContext<'_>,
    record_id: &str,
) -> Result<AcademicRecord, RegistrarError> {
    let record = fetch(&*ctx.store, record_id)?;
    require_department_access(&ctx.caller, &record.department)?;
    Ok(record)
}

/// Approve a record and recompute the student's CGPA. Registrar only.
///
/// A second approval of the same record fails with a conflict rather than
/// silently succeeding, so a lost commit race surfaces to its loser.
pub fn approve_academic_record(
    ctx: &mut TxContext<'_>,
    record_id: &str,
) -> Result<(), RegistrarError> {
    require_organization(&ctx.caller, &[ORG_REGISTRAR])?;

    let mut record = fetch(&*ctx.store, record_id)?;
    let old_status = match record.status {
        RecordStatus::Approved => {
            return Err(RegistrarError::Conflict(format!(
                "record {record_id} is already approved"
            )));
        }
        status @ (RecordStatus::Draft | RecordStatus::Submitted) => status,
    };

    // The approved set includes this record's SGPA: compute over history
    // with this record counted as approved.
    let mut history = load_history(&*ctx.store, &record.student_id)?;
    for past in &mut history {
        if past.record_id == record.record_id {
            past.status = RecordStatus::Approved;
        }
    }
    let cgpa = grading::cgpa(&history, record.semester);

    record.cgpa = cgpa;
    record.status = RecordStatus::Approved;
    record.approved_by = ctx.caller.unique_id().to_string();

    put_json(ctx.store, record_id, &record)?;
    index::reindex(
        ctx.store,
        index::RECORD_BY_STATUS,
        Some(&[old_status.as_str(), &record.student_id]),
        &[record.status.as_str(), &record.student_id],
        record_id,
    )?;

    let payload = events::RecordApproved {
        record_id,
        student_id: &record.student_id,
        semester: record.semester,
        department: &record.department,
        sgpa: record.sgpa,
        cgpa,
        approved_by: &record.approved_by,
        timestamp: ctx.tx_time,
    };
    events::emit(ctx, RECORD_APPROVED, &payload)
}

/// All records for one student, with inaccessible departments silently
/// skipped rather than failing the whole read.
pub fn student_history(
    ctx: &TxContext<'_>,
    student_id: &str,
) -> Result<Vec<AcademicRecord>, RegistrarError> {
    let records = load_history(&*ctx.store, student_id)?;
    Ok(records
        .into_iter()
        .filter(|record| require_department_access(&ctx.caller, &record.department).is_ok())
        .collect())
}
