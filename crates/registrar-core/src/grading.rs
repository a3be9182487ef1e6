//! Grade points, SGPA, and CGPA.
//!
//! Both aggregates are pure functions of their inputs. SGPA is computed
//! once at record creation; CGPA is recomputed on every approval by a full
//! scan of the student's record set. No incremental running total exists,
//! so the cost of an approval is linear in the student's record count.

use crate::model::{AcademicRecord, Course, Grade, RecordStatus};

impl Grade {
    /// Point value on the 10-point scale.
    pub fn points(&self) -> f64 {
        match self {
            Self::S => 10.0,
            Self::A => 9.0,
            Self::B => 8.0,
            Self::C => 7.0,
            Self::D => 6.0,
            Self::P => 5.0,
            Self::U => 0.0,
            Self::R => 0.0,
        }
    }
}

/// Credit-weighted semester grade-point average.
///
/// Returns 0 when total credits are 0 (guards division by zero).
pub fn sgpa(courses: &[Course]) -> f64 {
    let mut total_credits = 0.0;
    let mut total_points = 0.0;
    for course in courses {
        total_credits += course.credits;
        total_points += course.grade.points() * course.credits;
    }
    if total_credits > 0.0 {
        total_points / total_credits
    } else {
        0.0
    }
}

/// Credit-weighted cumulative grade-point average over all APPROVED
/// records with semester ≤ `upto_semester`.
///
/// Returns 0 when no record contributes.
pub fn cgpa(records: &[AcademicRecord], upto_semester: u8) -> f64 {
    let mut total_credits = 0.0;
    let mut total_points = 0.0;
    for record in records {
        if record.status == RecordStatus::Approved && record.semester <= upto_semester {
            total_credits += record.total_credits;
            total_points += record.sgpa * record.total_credits;
        }
    }
    if total_credits > 0.0 {
        total_points / total_credits
    } else {
        0.0
    }
}
