//! Ownership guard for instructor-scoped entities.
//!
//! # Responsibility
//! - Decide whether a principal owns a section, assignment, grade or
//!   enrollment, resolving transitively to the owning section.
//! - Turn lookups into a tagged outcome so callers cannot mistake
//!   "absent" for "not yours".
//!
//! # Invariants
//! - Ownership holds iff `section.instructor_email == principal.email`
//!   (exact, case-sensitive).
//! - A non-owner never receives the entity, only a rejection.
//! - Role capability is checked before any lookup.

use crate::model::academic::{EntityKind, InstructorScoped};
use crate::model::principal::{Principal, Role};
use crate::service::error::{AuthorizationFailure, ServiceError, ServiceResult};
use log::warn;

/// Outcome of resolving an entity on behalf of a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership<T> {
    /// Found, and the principal owns its section.
    Authorized(T),
    /// Found, owned by someone else. The entity is withheld.
    Unauthorized,
    /// No such entity.
    NotFound,
}

impl<T: InstructorScoped> Ownership<T> {
    /// Classifies a lookup result against the principal.
    pub fn resolve(found: Option<T>, principal: &Principal) -> Self {
        match found {
            None => Self::NotFound,
            Some(entity) if authorize_instructor(&principal.email, &entity) => {
                Self::Authorized(entity)
            }
            Some(_) => Self::Unauthorized,
        }
    }
}

impl<T> Ownership<T> {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    /// Returns the entity, or a distinct not-found / not-authorized error.
    pub fn require(self, entity: EntityKind, id: i64) -> ServiceResult<T> {
        match self {
            Self::Authorized(value) => Ok(value),
            Self::Unauthorized => {
                warn!(
                    "event=ownership_check module=service status=denied entity={} id={}",
                    entity, id
                );
                Err(ServiceError::not_owner(entity, id))
            }
            Self::NotFound => Err(ServiceError::not_found(entity, id)),
        }
    }

    /// Like `require`, but reports a missing entity as not-authorized so the
    /// caller learns nothing about which identifiers exist.
    pub fn require_concealed(self, entity: EntityKind, id: i64) -> ServiceResult<T> {
        match self {
            Self::NotFound => {
                warn!(
                    "event=ownership_check module=service status=denied entity={} id={} reason=absent",
                    entity, id
                );
                Err(ServiceError::not_owner(entity, id))
            }
            other => other.require(entity, id),
        }
    }
}

/// Returns true iff `principal_email` is the instructor of the section that
/// owns `target`.
pub fn authorize_instructor(principal_email: &str, target: &impl InstructorScoped) -> bool {
    target.owning_section().instructor_email == principal_email
}

/// Capability check: the principal's role claim must be `role`.
pub fn require_role(principal: &Principal, role: Role) -> ServiceResult<()> {
    if principal.has_role(role) {
        return Ok(());
    }
    warn!(
        "event=role_check module=service status=denied required={} actual={}",
        role, principal.role
    );
    Err(ServiceError::NotAuthorized(AuthorizationFailure::MissingRole {
        required: role,
        actual: principal.role,
    }))
}

#[cfg(test)]
mod tests {
    use super::{authorize_instructor, require_role, Ownership};
    use crate::model::academic::{Assignment, Course, EntityKind, Grade, Section, Term};
    use crate::model::principal::{Principal, Role};
    use chrono::NaiveDate;

    fn section(instructor: &str) -> Section {
        Section {
            section_no: 1,
            section_id: 1,
            instructor_email: instructor.to_string(),
            building: "052".to_string(),
            room: "104".to_string(),
            times: "M W 10:00-11:50".to_string(),
            term: Term {
                year: 2025,
                semester: "Fall".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 8, 20).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 12, 17).unwrap(),
            },
            course: Course {
                course_id: "cst438".to_string(),
                title: "Software Engineering".to_string(),
                credits: 4,
            },
        }
    }

    fn grade(instructor: &str) -> Grade {
        Grade {
            grade_id: 10,
            score: None,
            assignment: Assignment {
                assignment_id: 3,
                title: "HW1".to_string(),
                due_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                section: section(instructor),
            },
            enrollment_id: 2,
        }
    }

    #[test]
    fn grade_ownership_resolves_through_assignment_section() {
        assert!(authorize_instructor("ted@csumb.edu", &grade("ted@csumb.edu")));
        assert!(!authorize_instructor("ted2@csumb.edu", &grade("ted@csumb.edu")));
    }

    #[test]
    fn ownership_comparison_is_exact() {
        assert!(!authorize_instructor("TED@csumb.edu", &section("ted@csumb.edu")));
    }

    #[test]
    fn resolve_distinguishes_three_outcomes() {
        let ted = Principal::instructor("ted@csumb.edu");
        assert!(Ownership::resolve(Some(section("ted@csumb.edu")), &ted).is_authorized());
        assert_eq!(
            Ownership::resolve(Some(section("ted2@csumb.edu")), &ted),
            Ownership::Unauthorized
        );
        assert_eq!(Ownership::<Section>::resolve(None, &ted), Ownership::NotFound);
    }

    #[test]
    fn require_and_require_concealed_error_kinds() {
        let missing = Ownership::<Section>::NotFound;
        assert!(missing
            .clone()
            .require(EntityKind::Section, 9999)
            .unwrap_err()
            .is_not_found());
        assert!(missing
            .require_concealed(EntityKind::Section, 9999)
            .unwrap_err()
            .is_not_authorized());
        assert!(Ownership::<Section>::Unauthorized
            .require(EntityKind::Section, 6)
            .unwrap_err()
            .is_not_authorized());
    }

    #[test]
    fn role_capability_check() {
        assert!(require_role(&Principal::instructor("ted@csumb.edu"), Role::Instructor).is_ok());
        let err = require_role(&Principal::student("sam@csumb.edu"), Role::Instructor).unwrap_err();
        assert!(err.is_not_authorized());
    }
}
