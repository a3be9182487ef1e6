//! Pure field validators.
//!
//! No side effects and no ledger access; every function is deterministic
//! and safe to call any number of times. Enum membership checks live on
//! the types themselves (`model::*::parse`), not here.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RegistrarError;

/// Institutional student email domain.
pub const STUDENT_EMAIL_DOMAIN: &str = "student.nitw.ac.in";

pub const MIN_COURSE_CREDITS: f64 = 0.5;
pub const MAX_COURSE_CREDITS: f64 = 6.0;

pub const MIN_SEMESTER: u8 = 1;
pub const MAX_SEMESTER: u8 = 8;

pub const MIN_SEMESTER_CREDITS: f64 = 16.0;
pub const MAX_SEMESTER_CREDITS: f64 = 30.0;

pub const MIN_ENROLLMENT_YEAR: i32 = 1950;

pub const MIN_REVOCATION_REASON_LEN: usize = 10;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@student\.nitw\.ac\.in$").expect("email pattern is valid")
});

/// Institutional email: local part followed by the student domain.
pub fn validate_email(email: &str) -> Result<(), RegistrarError> {
    if !EMAIL_RE.is_match(email) {
        return Err(RegistrarError::Format(format!(
            "email must be a valid address under @{STUDENT_EMAIL_DOMAIN}"
        )));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), RegistrarError> {
    if name.len() < 3 || name.len() > 100 {
        return Err(RegistrarError::Range(
            "name must be between 3 and 100 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_roll_number(roll_number: &str) -> Result<(), RegistrarError> {
    if roll_number.len() < 5 || roll_number.len() > 20 {
        return Err(RegistrarError::Range(
            "roll number must be between 5 and 20 characters".into(),
        ));
    }
    Ok(())
}

/// Enrollment year must be plausible: not before 1950, at most one year
/// ahead of the transaction clock.
pub fn validate_enrollment_year(year: i32, current_year: i32) -> Result<(), RegistrarError> {
    if year < MIN_ENROLLMENT_YEAR || year > current_year + 1 {
        return Err(RegistrarError::Range(format!(
            "invalid enrollment year {year}"
        )));
    }
    Ok(())
}

pub fn validate_course_code(code: &str) -> Result<(), RegistrarError> {
    if code.len() < 3 || code.len() > 20 {
        return Err(RegistrarError::Range(
            "course code must be between 3 and 20 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_course_name(name: &str) -> Result<(), RegistrarError> {
    if name.len() < 3 || name.len() > 100 {
        return Err(RegistrarError::Range(
            "course name must be between 3 and 100 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_credits(credits: f64) -> Result<(), RegistrarError> {
    if !(MIN_COURSE_CREDITS..=MAX_COURSE_CREDITS).contains(&credits) {
        return Err(RegistrarError::Range(format!(
            "credits must be between {MIN_COURSE_CREDITS} and {MAX_COURSE_CREDITS}"
        )));
    }
    Ok(())
}

pub fn validate_semester(semester: u8) -> Result<(), RegistrarError> {
    if !(MIN_SEMESTER..=MAX_SEMESTER).contains(&semester) {
        return Err(RegistrarError::Range(format!(
            "semester must be between {MIN_SEMESTER} and {MAX_SEMESTER}"
        )));
    }
    Ok(())
}

/// Aggregate credits for one semester's record.
pub fn validate_semester_credits(total: f64) -> Result<(), RegistrarError> {
    if !(MIN_SEMESTER_CREDITS..=MAX_SEMESTER_CREDITS).contains(&total) {
        return Err(RegistrarError::Range(format!(
            "total semester credits {total:.1} out of range (must be {MIN_SEMESTER_CREDITS:.0}-{MAX_SEMESTER_CREDITS:.0})"
        )));
    }
    Ok(())
}

pub fn validate_revocation_reason(reason: &str) -> Result<(), RegistrarError> {
    if reason.len() < MIN_REVOCATION_REASON_LEN {
        return Err(RegistrarError::Range(format!(
            "revocation reason must be at least {MIN_REVOCATION_REASON_LEN} characters"
        )));
    }
    Ok(())
}
