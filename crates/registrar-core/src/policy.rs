//! Access policy: organization and department checks.
//!
//! Three trust domains share the ledger. The central registrar authority
//! may touch everything; a departmental caller is scoped to the department
//! named by the signed `department` attribute on its credential; verifiers
//! get only the hash-anchored certificate surface, which needs no policy.

use registrar_ledger::Caller;

use crate::error::RegistrarError;

/// The central registrar authority's organization.
pub const ORG_REGISTRAR: &str = "RegistrarMSP";

/// The academic departments' shared organization; scoped per-department
/// by the `department` credential attribute.
pub const ORG_DEPARTMENTS: &str = "DepartmentsMSP";

/// External verifiers. No write access anywhere.
pub const ORG_VERIFIERS: &str = "VerifiersMSP";

/// Credential attribute naming the caller's department.
pub const ATTR_DEPARTMENT: &str = "department";

/// Deny unless the caller's organization is one of `allowed`.
pub fn require_organization(caller: &Caller, allowed: &[&str]) -> Result<(), RegistrarError> {
    if allowed.contains(&caller.organization()) {
        return Ok(());
    }
    Err(RegistrarError::Authorization(format!(
        "only {} may perform this operation",
        allowed.join(", ")
    )))
}

/// Deny unless the caller may read data belonging to `department`.
///
/// The registrar passes unconditionally. A departmental caller passes only
/// when its signed `department` attribute equals the target exactly. Any
/// other organization is denied.
pub fn require_department_access(caller: &Caller, department: &str) -> Result<(), RegistrarError> {
    match caller.organization() {
        org if org == ORG_REGISTRAR => Ok(()),
        org if org == ORG_DEPARTMENTS => match caller.attribute(ATTR_DEPARTMENT) {
            None => Err(RegistrarError::Authorization(
                "department attribute not found on caller credential".into(),
            )),
            Some(dept) if dept != department => Err(RegistrarError::Authorization(format!(
                "cannot access records from department {department}"
            ))),
            Some(_) => Ok(()),
        },
        _ => Err(RegistrarError::Authorization(
            "organization has no department access".into(),
        )),
    }
}
