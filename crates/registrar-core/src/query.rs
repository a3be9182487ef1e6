//! Paginated queries over the secondary indices.
//!
//! Every page is served from an index scan; each hit is resolved back to
//! its primary entity, and entities the caller may not see are silently
//! skipped rather than failing the page. The fetched count therefore
//! reports index entries scanned, which may exceed the entities returned.

use registrar_ledger::{PagedScan, TxContext};

use crate::error::RegistrarError;
use crate::index;
use crate::model::{AcademicRecord, RecordStatus, Student, StudentStatus};
use crate::policy::require_department_access;
use crate::storage::get_json;
use crate::validate::{self, MIN_ENROLLMENT_YEAR};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

/// A page request: size bound plus resumption cursor.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Requested page size. Zero or anything over the ceiling silently
    /// falls back to the default rather than failing.
    pub page_size: usize,
    /// Cursor from the previous page's result; empty starts from the top.
    pub cursor: String,
}

impl PageRequest {
    pub fn new(page_size: usize, cursor: impl Into<String>) -> Self {
        Self {
            page_size,
            cursor: cursor.into(),
        }
    }

    pub fn first_page(page_size: usize) -> Self {
        Self::new(page_size, "")
    }

    fn effective_size(&self) -> usize {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}

/// One page of entities plus resumption metadata.
#[derive(Debug, Clone)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Empty when the scan is exhausted.
    pub next_cursor: String,
    /// Index entries fetched for this page, before policy filtering.
    pub fetched_count: usize,
    /// Mirrors `next_cursor` being non-empty: more data may exist.
    pub has_more: bool,
}

impl<T> PagedResult<T> {
    fn new(items: Vec<T>, next_cursor: String, fetched_count: usize) -> Self {
        let has_more = !next_cursor.is_empty();
        Self {
            items,
            next_cursor,
            fetched_count,
            has_more,
        }
    }
}

/// Resolve a scan's hits to students the caller may see.
fn resolve_students(
    ctx: &TxContext<'_>,
    scan: &PagedScan,
) -> Result<Vec<Student>, RegistrarError> {
    let mut students = Vec::new();
    for (key, _) in &scan.entries {
        let Some(roll_number) = index::primary_key(key) else {
            continue;
        };
        let Some(student) = get_json::<Student>(&*ctx.store, roll_number)? else {
            continue;
        };
        if require_department_access(&ctx.caller, &student.department).is_err() {
            continue;
        }
        students.push(student);
    }
    Ok(students)
}

/// Resolve a scan's hits to records the caller may see.
fn resolve_records(
    ctx: &TxContext<'_>,
    scan: &PagedScan,
) -> Result<Vec<AcademicRecord>, RegistrarError> {
    let mut records = Vec::new();
    for (key, _) in &scan.entries {
        let Some(record_id) = index::primary_key(key) else {
            continue;
        };
        let Some(record) = get_json::<AcademicRecord>(&*ctx.store, record_id)? else {
            continue;
        };
        if require_department_access(&ctx.caller, &record.department).is_err() {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// Students of one department. The department gate is checked up front so
/// a caller probing a foreign department fails instead of paging nothing.
pub fn students_by_department(
    ctx: &TxContext<'_>,
    department: &str,
    page: &PageRequest,
) -> Result<PagedResult<Student>, RegistrarError> {
    require_department_access(&ctx.caller, department)?;

    let scan = index::scan_page(
        &*ctx.store,
        index::STUDENT_BY_DEPARTMENT,
        &[department],
        page.effective_size(),
        &page.cursor,
    )?;
    let students = resolve_students(ctx, &scan)?;
    Ok(PagedResult::new(students, scan.next_cursor, scan.fetched_count))
}

/// Students of one enrollment year, policy-filtered per student.
pub fn students_by_year(
    ctx: &TxContext<'_>,
    year: i32,
    page: &PageRequest,
) -> Result<PagedResult<Student>, RegistrarError> {
    if year < MIN_ENROLLMENT_YEAR {
        return Err(RegistrarError::Range(format!(
            "invalid enrollment year {year}"
        )));
    }

    let year = year.to_string();
    let scan = index::scan_page(
        &*ctx.store,
        index::STUDENT_BY_YEAR,
        &[&year],
        page.effective_size(),
        &page.cursor,
    )?;
    let students = resolve_students(ctx, &scan)?;
    Ok(PagedResult::new(students, scan.next_cursor, scan.fetched_count))
}

/// Students in one lifecycle status, policy-filtered per student.
pub fn students_by_status(
    ctx: &TxContext<'_>,
    status: StudentStatus,
    page: &PageRequest,
) -> Result<PagedResult<Student>, RegistrarError> {
    let scan = index::scan_page(
        &*ctx.store,
        index::STUDENT_BY_STATUS,
        &[status.as_str()],
        page.effective_size(),
        &page.cursor,
    )?;
    let students = resolve_students(ctx, &scan)?;
    Ok(PagedResult::new(students, scan.next_cursor, scan.fetched_count))
}

/// Records of one semester across all students, policy-filtered per record.
pub fn records_by_semester(
    ctx: &TxContext<'_>,
    semester: u8,
    page: &PageRequest,
) -> Result<PagedResult<AcademicRecord>, RegistrarError> {
    validate::validate_semester(semester)?;

    let semester = semester.to_string();
    let scan = index::scan_page(
        &*ctx.store,
        index::RECORD_BY_SEMESTER,
        &[&semester],
        page.effective_size(),
        &page.cursor,
    )?;
    let records = resolve_records(ctx, &scan)?;
    Ok(PagedResult::new(records, scan.next_cursor, scan.fetched_count))
}

/// Records in one workflow status, policy-filtered per record.
pub fn records_by_status(
    ctx: &TxContext<'_>,
    status: RecordStatus,
    page: &PageRequest,
) -> Result<PagedResult<AcademicRecord>, RegistrarError> {
    let scan = index::scan_page(
        &*ctx.store,
        index::RECORD_BY_STATUS,
        &[status.as_str()],
        page.effective_size(),
        &page.cursor,
    )?;
    let records = resolve_records(ctx, &scan)?;
    Ok(PagedResult::new(records, scan.next_cursor, scan.fetched_count))
}

/// Which status scan a pending-records cursor points into.
///
/// Pending records span two index dimensions (DRAFT, then SUBMITTED), so
/// the continuation cursor carries a phase tag: DRAFT pages drain fully
/// before SUBMITTED pages begin.
enum PendingPhase {
    Draft(String),
    Submitted(String),
}

fn parse_pending_cursor(cursor: &str) -> Result<PendingPhase, RegistrarError> {
    if cursor.is_empty() {
        return Ok(PendingPhase::Draft(String::new()));
    }
    if let Some(inner) = cursor.strip_prefix("d:") {
        return Ok(PendingPhase::Draft(inner.to_string()));
    }
    if let Some(inner) = cursor.strip_prefix("s:") {
        return Ok(PendingPhase::Submitted(inner.to_string()));
    }
    Err(RegistrarError::Format(format!(
        "invalid pending-records cursor: {cursor}"
    )))
}

/// Records awaiting approval: every DRAFT record, then every SUBMITTED
/// record, under one resumable cursor. Policy-filtered per record.
pub fn pending_records(
    ctx: &TxContext<'_>,
    page: &PageRequest,
) -> Result<PagedResult<AcademicRecord>, RegistrarError> {
    let size = page.effective_size();

    let (draft_cursor, submitted_cursor) = match parse_pending_cursor(&page.cursor)? {
        PendingPhase::Draft(inner) => (Some(inner), None),
        PendingPhase::Submitted(inner) => (None, Some(inner)),
    };

    let mut items = Vec::new();
    let mut fetched = 0;

    if let Some(inner) = draft_cursor {
        let scan = index::scan_page(
            &*ctx.store,
            index::RECORD_BY_STATUS,
            &[RecordStatus::Draft.as_str()],
            size,
            &inner,
        )?;
        fetched += scan.fetched_count;
        items.extend(resolve_records(ctx, &scan)?);

        if !scan.next_cursor.is_empty() {
            let next = format!("d:{}", scan.next_cursor);
            return Ok(PagedResult::new(items, next, fetched));
        }

        // DRAFT drained; fill what capacity remains from SUBMITTED.
        let remaining = size - scan.fetched_count;
        if remaining == 0 {
            return Ok(PagedResult::new(items, "s:".to_string(), fetched));
        }
        let scan = index::scan_page(
            &*ctx.store,
            index::RECORD_BY_STATUS,
            &[RecordStatus::Submitted.as_str()],
            remaining,
            "",
        )?;
        fetched += scan.fetched_count;
        items.extend(resolve_records(ctx, &scan)?);
        let next = if scan.next_cursor.is_empty() {
            String::new()
        } else {
            format!("s:{}", scan.next_cursor)
        };
        return Ok(PagedResult::new(items, next, fetched));
    }

    let inner = submitted_cursor.unwrap_or_default();
    let scan = index::scan_page(
        &*ctx.store,
        index::RECORD_BY_STATUS,
        &[RecordStatus::Submitted.as_str()],
        size,
        &inner,
    )?;
    fetched += scan.fetched_count;
    items.extend(resolve_records(ctx, &scan)?);
    let next = if scan.next_cursor.is_empty() {
        String::new()
    } else {
        format!("s:{}", scan.next_cursor)
    };
    Ok(PagedResult::new(items, next, fetched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use registrar_ledger::{Caller, MemoryLedger, RecordingSink, TxContext};

    use crate::model::{Course, Grade};
    use crate::policy::{ATTR_DEPARTMENT, ORG_DEPARTMENTS, ORG_REGISTRAR};
    use crate::record::{NewRecord, create_academic_record};
    use crate::student::{NewStudent, create_student};

    fn registrar() -> Caller {
        Caller::new(ORG_REGISTRAR, "x509::registrar-clerk")
    }

    fn tx<'a>(
        caller: Caller,
        ledger: &'a mut MemoryLedger,
        sink: &'a mut RecordingSink,
    ) -> TxContext<'a> {
        let tx_time = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).single().expect("tx time");
        TxContext::new(caller, tx_time, ledger, sink)
    }

    fn seed_student(ctx: &mut TxContext<'_>, roll: &str, dept: &str, year: i32) {
        create_student(
            ctx,
            NewStudent {
                roll_number: roll.to_string(),
                name: format!("Student {roll}"),
                department: dept.to_string(),
                enrollment_year: year,
                email: format!("{}@student.nitw.ac.in", roll.to_lowercase()),
                national_id_hash: "a".repeat(64),
                admission_category: "GEN".to_string(),
            },
        )
        .expect("seed student");
    }

    fn seed_record(ctx: &mut TxContext<'_>, record_id: &str, roll: &str, dept: &str, semester: u8) {
        let courses: Vec<Course> = (0..6)
            .map(|i| Course {
                course_code: format!("GE10{i}"),
                course_name: format!("Course {i}"),
                credits: 3.0,
                grade: Grade::A,
                faculty_id: "F001".to_string(),
            })
            .collect();
        create_academic_record(
            ctx,
            NewRecord {
                record_id: record_id.to_string(),
                roll_number: roll.to_string(),
                semester,
                department: dept.to_string(),
                courses,
            },
        )
        .expect("seed record");
    }

    #[test]
    fn zero_page_size_falls_back_to_the_default_bound() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        let mut ctx = tx(registrar(), &mut ledger, &mut sink);
        for i in 0..3 {
            seed_student(&mut ctx, &format!("CS21B00{i}"), "CSE", 2021);
        }

        let page = students_by_department(&ctx, "CSE", &PageRequest::first_page(0))
            .expect("query");
        assert_eq!(page.items.len(), 3);
        assert!(page.next_cursor.is_empty());
        assert!(!page.has_more);

        // Over-ceiling requests clamp the same way.
        let page = students_by_department(&ctx, "CSE", &PageRequest::first_page(1000))
            .expect("query");
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn department_pages_resume_from_the_cursor() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        let mut ctx = tx(registrar(), &mut ledger, &mut sink);
        for i in 0..5 {
            seed_student(&mut ctx, &format!("CS21B00{i}"), "CSE", 2021);
        }

        let mut seen = Vec::new();
        let mut page = PageRequest::first_page(2);
        loop {
            let result = students_by_department(&ctx, "CSE", &page).expect("query");
            assert!(result.items.len() <= 2);
            seen.extend(result.items.iter().map(|s| s.roll_number.clone()));
            if !result.has_more {
                break;
            }
            page = PageRequest::new(2, result.next_cursor);
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn foreign_department_query_fails_up_front() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        {
            let mut ctx = tx(registrar(), &mut ledger, &mut sink);
            seed_student(&mut ctx, "CS21B001", "CSE", 2021);
        }

        let ece =
            Caller::new(ORG_DEPARTMENTS, "x509::ece-clerk").with_attribute(ATTR_DEPARTMENT, "ECE");
        let ctx = tx(ece, &mut ledger, &mut sink);
        let err = students_by_department(&ctx, "CSE", &PageRequest::first_page(10))
            .expect_err("foreign department");
        assert!(matches!(err, RegistrarError::Authorization(_)));
    }

    #[test]
    fn status_query_silently_skips_inaccessible_students() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        {
            let mut ctx = tx(registrar(), &mut ledger, &mut sink);
            seed_student(&mut ctx, "CS21B001", "CSE", 2021);
            seed_student(&mut ctx, "EC21B001", "ECE", 2021);
        }

        let ece =
            Caller::new(ORG_DEPARTMENTS, "x509::ece-clerk").with_attribute(ATTR_DEPARTMENT, "ECE");
        let ctx = tx(ece, &mut ledger, &mut sink);
        let page = students_by_status(&ctx, StudentStatus::Active, &PageRequest::first_page(10))
            .expect("query");

        // Both index entries were fetched; only the accessible one returned.
        assert_eq!(page.fetched_count, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].roll_number, "EC21B001");
    }

    #[test]
    fn year_query_validates_and_filters() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        let mut ctx = tx(registrar(), &mut ledger, &mut sink);
        seed_student(&mut ctx, "CS20B001", "CSE", 2020);
        seed_student(&mut ctx, "CS21B001", "CSE", 2021);

        let err = students_by_year(&ctx, 1900, &PageRequest::first_page(10))
            .expect_err("implausible year");
        assert!(matches!(err, RegistrarError::Range(_)));

        let page =
            students_by_year(&ctx, 2021, &PageRequest::first_page(10)).expect("query");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].roll_number, "CS21B001");
    }

    #[test]
    fn semester_query_returns_matching_records() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        let mut ctx = tx(registrar(), &mut ledger, &mut sink);
        seed_student(&mut ctx, "CS21B001", "CSE", 2021);
        seed_record(&mut ctx, "REC-1", "CS21B001", "CSE", 1);
        seed_record(&mut ctx, "REC-2", "CS21B001", "CSE", 2);

        let err = records_by_semester(&ctx, 9, &PageRequest::first_page(10))
            .expect_err("semester out of range");
        assert!(matches!(err, RegistrarError::Range(_)));

        let page = records_by_semester(&ctx, 2, &PageRequest::first_page(10)).expect("query");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].record_id, "REC-2");
    }

    #[test]
    fn pending_records_drain_drafts_before_submitted_under_one_cursor() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        let mut ctx = tx(registrar(), &mut ledger, &mut sink);
        seed_student(&mut ctx, "CS21B001", "CSE", 2021);
        for (i, sem) in (1..=3).enumerate() {
            seed_record(&mut ctx, &format!("REC-{i}"), "CS21B001", "CSE", sem);
        }

        // Move one record to SUBMITTED by hand (no operation produces it).
        let mut submitted =
            crate::record::get_academic_record(&ctx, "REC-2").expect("read");
        submitted.status = RecordStatus::Submitted;
        crate::storage::put_json(ctx.store, "REC-2", &submitted).expect("rewrite");
        crate::index::reindex(
            ctx.store,
            crate::index::RECORD_BY_STATUS,
            Some(&["DRAFT", "CS21B001"]),
            &["SUBMITTED", "CS21B001"],
            "REC-2",
        )
        .expect("reindex");

        let mut page = PageRequest::first_page(2);
        let mut statuses = Vec::new();
        loop {
            let result = pending_records(&ctx, &page).expect("query");
            statuses.extend(result.items.iter().map(|r| r.status));
            if !result.has_more {
                break;
            }
            page = PageRequest::new(2, result.next_cursor);
        }

        assert_eq!(
            statuses,
            vec![
                RecordStatus::Draft,
                RecordStatus::Draft,
                RecordStatus::Submitted
            ]
        );
    }

    #[test]
    fn malformed_pending_cursor_is_a_format_error() {
        let mut ledger = MemoryLedger::new();
        let mut sink = RecordingSink::new();
        let ctx = tx(registrar(), &mut ledger, &mut sink);
        let err = pending_records(&ctx, &PageRequest::new(10, "bogus"))
            .expect_err("unparseable cursor");
        assert!(matches!(err, RegistrarError::Format(_)));
    }
}
