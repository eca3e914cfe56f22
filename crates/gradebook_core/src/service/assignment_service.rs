//! Assignment use-case service.
//!
//! # Responsibility
//! - Instructor lifecycle of assignments: list, create, update, delete.
//! - Student listing of assignments across enrolled sections with own scores.
//! - Instructor listing of the sections they teach in a term.
//!
//! # Invariants
//! - After any successful create/update, `term.start_date <= due_date <= term.end_date`
//!   for the owning section's term.
//! - The owning section of an assignment never changes after creation.
//! - Listing or creating against a section the principal does not own, or
//!   that does not exist, yields `NotAuthorized` for both cases.
//! - Deleting an assignment also deletes its grades.

use crate::model::academic::{AssignmentId, EntityKind, SectionNo};
use crate::model::principal::{Principal, Role};
use crate::model::records::{
    AssignmentRecord, AssignmentUpdate, AssignmentWithScoreRecord, NewAssignment, SectionRecord,
};
use crate::model::validation::{due_date_within_term, validate_title};
use crate::repo::{AssignmentRepository, GradeRepository, SectionRepository};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::grade_service::score_for;
use crate::service::ownership::{require_role, Ownership};
use log::{info, warn};

/// Assignment service facade over store implementations.
pub struct AssignmentService<S> {
    store: S,
}

impl<S> AssignmentService<S>
where
    S: SectionRepository + AssignmentRepository + GradeRepository,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Sections the instructor teaches in one term, ordered by section number.
    pub fn list_sections_for_instructor(
        &self,
        principal: &Principal,
        year: i32,
        semester: &str,
    ) -> ServiceResult<Vec<SectionRecord>> {
        require_role(principal, Role::Instructor)?;
        let sections =
            self.store
                .find_sections_by_instructor_and_term(&principal.email, year, semester)?;
        if sections.is_empty() {
            return Ok(Vec::new());
        }

        let instructor_name = match self.store.find_user_by_email(&principal.email)? {
            Some(user) => user.name,
            None => {
                warn!(
                    "event=section_list module=service status=degraded reason=instructor_user_missing"
                );
                String::new()
            }
        };
        Ok(sections
            .iter()
            .map(|section| SectionRecord::new(section, instructor_name.as_str()))
            .collect())
    }

    /// All assignments of an owned section.
    pub fn list_for_section(
        &self,
        principal: &Principal,
        section_no: SectionNo,
    ) -> ServiceResult<Vec<AssignmentRecord>> {
        require_role(principal, Role::Instructor)?;
        let section = Ownership::resolve(self.store.find_section(section_no)?, principal)
            .require_concealed(EntityKind::Section, section_no)?;

        let assignments = self.store.find_assignments_by_section(section.section_no)?;
        Ok(assignments.iter().map(AssignmentRecord::from).collect())
    }

    /// Creates an assignment in an owned section.
    ///
    /// Checks run in this order: section ownership, due date, title.
    pub fn create(
        &self,
        principal: &Principal,
        input: &NewAssignment,
    ) -> ServiceResult<AssignmentRecord> {
        require_role(principal, Role::Instructor)?;
        let section = Ownership::resolve(self.store.find_section(input.section_no)?, principal)
            .require_concealed(EntityKind::Section, input.section_no)?;

        let due_date = due_date_within_term(input.due_date.as_deref(), &section.term)?;
        let title = validate_title(input.title.as_deref())?;

        let assignment_id =
            self.store
                .insert_assignment(section.section_no, title.as_str(), due_date)?;
        let created = self
            .store
            .find_assignment(assignment_id)?
            .ok_or(ServiceError::InconsistentState(
                "created assignment not found in read-back",
            ))?;

        info!(
            "event=assignment_create module=service status=ok section_no={} assignment_id={}",
            section.section_no, assignment_id
        );
        Ok(AssignmentRecord::from(&created))
    }

    /// Replaces title and due date of an owned assignment.
    pub fn update(
        &self,
        principal: &Principal,
        input: &AssignmentUpdate,
    ) -> ServiceResult<AssignmentRecord> {
        require_role(principal, Role::Instructor)?;
        let assignment = Ownership::resolve(self.store.find_assignment(input.id)?, principal)
            .require(EntityKind::Assignment, input.id)?;

        let due_date = due_date_within_term(input.due_date.as_deref(), &assignment.section.term)?;
        let title = validate_title(input.title.as_deref())?;

        self.store
            .update_assignment(assignment.assignment_id, title.as_str(), due_date)?;
        let updated = self
            .store
            .find_assignment(assignment.assignment_id)?
            .ok_or(ServiceError::InconsistentState(
                "updated assignment not found in read-back",
            ))?;

        info!(
            "event=assignment_update module=service status=ok assignment_id={}",
            updated.assignment_id
        );
        Ok(AssignmentRecord::from(&updated))
    }

    /// Deletes an owned assignment together with its grades.
    pub fn delete(&self, principal: &Principal, assignment_id: AssignmentId) -> ServiceResult<()> {
        require_role(principal, Role::Instructor)?;
        let assignment = Ownership::resolve(self.store.find_assignment(assignment_id)?, principal)
            .require(EntityKind::Assignment, assignment_id)?;

        let grades_removed = self.store.delete_assignment(assignment.assignment_id)?;
        info!(
            "event=assignment_delete module=service status=ok assignment_id={} grades_removed={}",
            assignment.assignment_id, grades_removed
        );
        Ok(())
    }

    /// The calling student's assignments for one term, by ascending due date,
    /// each with the student's own score.
    ///
    /// Read-only: never materializes grade rows.
    pub fn list_for_student(
        &self,
        principal: &Principal,
        year: i32,
        semester: &str,
    ) -> ServiceResult<Vec<AssignmentWithScoreRecord>> {
        require_role(principal, Role::Student)?;
        let assignments =
            self.store
                .find_assignments_by_student_and_term(&principal.email, year, semester)?;

        assignments
            .iter()
            .map(|assignment| {
                let score = score_for(&self.store, &principal.email, assignment.assignment_id)?;
                Ok(AssignmentWithScoreRecord::new(assignment, score))
            })
            .collect()
    }
}
