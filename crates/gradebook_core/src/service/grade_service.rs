//! Grade materialization.
//!
//! # Responsibility
//! - Guarantee one grade row per (assignment, enrollment) pair, created on
//!   first instructor read with a null score.
//! - Serve read-only score lookups for student listings.
//!
//! # Invariants
//! - Listing an assignment's grades writes any missing rows before returning.
//! - Two concurrent materializations of one pair leave exactly one row; the
//!   loser of the insert race re-reads the winner's row.
//! - `score_for` never writes.

use crate::model::academic::{Assignment, AssignmentId, EntityKind, Enrollment, Grade};
use crate::model::principal::{Principal, Role};
use crate::model::records::GradeRecord;
use crate::repo::{AssignmentRepository, EnrollmentRepository, GradeRepository, RepoError};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::ownership::{require_role, Ownership};
use log::{debug, info};

/// Student's score on one assignment, `None` when ungraded or no grade row
/// exists yet.
pub fn score_for(
    store: &impl GradeRepository,
    student_email: &str,
    assignment_id: AssignmentId,
) -> ServiceResult<Option<i32>> {
    Ok(store
        .find_grade_by_student_and_assignment(student_email, assignment_id)?
        .and_then(|grade| grade.score))
}

pub struct GradeMaterializer<S> {
    store: S,
}

impl<S> GradeMaterializer<S>
where
    S: AssignmentRepository + EnrollmentRepository + GradeRepository,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// One grade per enrollment of the assignment's section, ordered by
    /// student name.
    ///
    /// Side effect: persists a null-score grade for every enrollment that has
    /// none yet (see [`Self::get_or_create_grade`]).
    pub fn list_for_assignment(
        &self,
        principal: &Principal,
        assignment_id: AssignmentId,
    ) -> ServiceResult<Vec<GradeRecord>> {
        require_role(principal, Role::Instructor)?;
        let assignment = Ownership::resolve(self.store.find_assignment(assignment_id)?, principal)
            .require(EntityKind::Assignment, assignment_id)?;

        let roster = self
            .store
            .find_enrollments_by_section_order_by_student_name(assignment.section.section_no)?;

        let mut records = Vec::with_capacity(roster.len());
        for enrollment in &roster {
            let grade = self.get_or_create_grade(&assignment, enrollment)?;
            records.push(GradeRecord::new(&grade, &enrollment.student));
        }
        debug!(
            "event=grade_list module=service status=ok assignment_id={} count={}",
            assignment.assignment_id,
            records.len()
        );
        Ok(records)
    }

    /// Returns the grade for the pair, inserting an unscored one if absent.
    ///
    /// This is a write: callers on a read path must tolerate the insert.
    pub fn get_or_create_grade(
        &self,
        assignment: &Assignment,
        enrollment: &Enrollment,
    ) -> ServiceResult<Grade> {
        if enrollment.section.section_no != assignment.section.section_no {
            return Err(ServiceError::InconsistentState(
                "enrollment and assignment belong to different sections",
            ));
        }

        if let Some(existing) = self.store.find_grade_by_enrollment_and_assignment(
            enrollment.enrollment_id,
            assignment.assignment_id,
        )? {
            return Ok(existing);
        }

        match self
            .store
            .insert_grade(assignment.assignment_id, enrollment.enrollment_id)
        {
            Ok(grade_id) => {
                info!(
                    "event=grade_materialize module=service status=ok assignment_id={} enrollment_id={} grade_id={}",
                    assignment.assignment_id, enrollment.enrollment_id, grade_id
                );
                self.store
                    .find_grade(grade_id)?
                    .ok_or(ServiceError::InconsistentState(
                        "materialized grade not found in read-back",
                    ))
            }
            Err(RepoError::Conflict { .. }) => {
                debug!(
                    "event=grade_materialize module=service status=ok reason=lost_race assignment_id={} enrollment_id={}",
                    assignment.assignment_id, enrollment.enrollment_id
                );
                self.store
                    .find_grade_by_enrollment_and_assignment(
                        enrollment.enrollment_id,
                        assignment.assignment_id,
                    )?
                    .ok_or(ServiceError::InconsistentState(
                        "conflicting grade not found in read-back",
                    ))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Read-only score lookup; see [`score_for`].
    pub fn score_for(
        &self,
        student_email: &str,
        assignment_id: AssignmentId,
    ) -> ServiceResult<Option<i32>> {
        score_for(&self.store, student_email, assignment_id)
    }
}
