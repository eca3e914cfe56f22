//! Batch score and final grade updates with registrar notification.
//!
//! # Responsibility
//! - Apply instructor batches of assignment scores and final letter grades.
//! - Publish one `updateEnrollment` event per committed letter grade.
//! - List a section's enrollments for grading.
//!
//! # Invariants
//! - Every item of a batch is validated before any write; a validation
//!   failure applies nothing and reports one message per offending item.
//! - Items are then applied in list order, each committed on its own. The
//!   first not-found or not-authorized item stops the batch; items before it
//!   stay committed (`ServiceError::BatchAborted`).
//! - A notification is published only after its item's write committed.
//!   Sink failures are logged and never fail the batch.

use crate::model::academic::{EntityKind, SectionNo};
use crate::model::principal::{Principal, Role};
use crate::model::records::{EnrollmentGradeUpdate, EnrollmentRecord, ScoreUpdate};
use crate::model::validation::{is_email_shaped, is_valid_letter_grade, LETTER_GRADE_MAX_CHARS};
use crate::registrar::{NotificationSink, RegistrarEvent};
use crate::repo::{EnrollmentRepository, GradeRepository, SectionRepository};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::ownership::{require_role, Ownership};
use log::{info, warn};

pub struct EnrollmentGradeSync<S, N> {
    store: S,
    sink: N,
}

impl<S, N> EnrollmentGradeSync<S, N>
where
    S: SectionRepository + EnrollmentRepository + GradeRepository,
    N: NotificationSink,
{
    pub fn new(store: S, sink: N) -> Self {
        Self { store, sink }
    }

    /// Enrollments of an owned section ordered by student name.
    pub fn list_for_section(
        &self,
        principal: &Principal,
        section_no: SectionNo,
    ) -> ServiceResult<Vec<EnrollmentRecord>> {
        require_role(principal, Role::Instructor)?;
        let section = Ownership::resolve(self.store.find_section(section_no)?, principal)
            .require(EntityKind::Section, section_no)?;

        let enrollments = self
            .store
            .find_enrollments_by_section_order_by_student_name(section.section_no)?;
        Ok(enrollments.iter().map(EnrollmentRecord::from).collect())
    }

    /// Writes assignment scores; returns the number of grades updated.
    pub fn update_scores(
        &self,
        principal: &Principal,
        updates: &[ScoreUpdate],
    ) -> ServiceResult<usize> {
        require_role(principal, Role::Instructor)?;
        validate_score_batch(updates)?;

        let mut applied = 0;
        for (index, update) in updates.iter().enumerate() {
            self.apply_score(principal, update)
                .map_err(|err| abort_batch("score_batch", index, applied, err))?;
            applied += 1;
        }

        info!(
            "event=score_batch module=service status=ok applied={}",
            applied
        );
        Ok(applied)
    }

    /// Writes final letter grades and notifies the registrar per committed
    /// item; returns the number of enrollments updated.
    pub fn update_enrollment_grades(
        &self,
        principal: &Principal,
        updates: &[EnrollmentGradeUpdate],
    ) -> ServiceResult<usize> {
        require_role(principal, Role::Instructor)?;
        validate_letter_grade_batch(updates)?;

        let mut applied = 0;
        for (index, update) in updates.iter().enumerate() {
            let record = self
                .apply_letter_grade(principal, update)
                .map_err(|err| abort_batch("enrollment_grade_batch", index, applied, err))?;
            applied += 1;
            self.publish(record);
        }

        info!(
            "event=enrollment_grade_batch module=service status=ok applied={}",
            applied
        );
        Ok(applied)
    }

    fn apply_score(&self, principal: &Principal, update: &ScoreUpdate) -> ServiceResult<()> {
        let grade = Ownership::resolve(self.store.find_grade(update.grade_id)?, principal)
            .require(EntityKind::Grade, update.grade_id)?;
        let score = update.score.ok_or(ServiceError::InconsistentState(
            "score missing after batch validation",
        ))?;
        self.store.update_grade_score(grade.grade_id, score)?;
        Ok(())
    }

    fn apply_letter_grade(
        &self,
        principal: &Principal,
        update: &EnrollmentGradeUpdate,
    ) -> ServiceResult<EnrollmentRecord> {
        let section = Ownership::resolve(self.store.find_section(update.section_no)?, principal)
            .require(EntityKind::Section, update.section_no)?;

        // An enrollment outside the named section is treated as absent.
        let found = self
            .store
            .find_enrollment(update.enrollment_id)?
            .filter(|enrollment| enrollment.section.section_no == section.section_no);
        let enrollment = Ownership::resolve(found, principal)
            .require(EntityKind::Enrollment, update.enrollment_id)?;

        let grade = update.grade.as_deref().map(str::trim);
        self.store
            .update_enrollment_grade(enrollment.enrollment_id, grade)?;

        let updated = self
            .store
            .find_enrollment(enrollment.enrollment_id)?
            .ok_or(ServiceError::InconsistentState(
                "updated enrollment not found in read-back",
            ))?;
        Ok(EnrollmentRecord::from(&updated))
    }

    fn publish(&self, record: EnrollmentRecord) {
        let enrollment_id = record.enrollment_id;
        let event = RegistrarEvent::update_enrollment(record);
        match self.sink.notify(&event) {
            Ok(()) => info!(
                "event=registrar_notify module=service status=ok kind={} enrollment_id={}",
                event.kind, enrollment_id
            ),
            Err(err) => warn!(
                "event=registrar_notify module=service status=error kind={} enrollment_id={} error={}",
                event.kind, enrollment_id, err
            ),
        }
    }
}

fn validate_score_batch(updates: &[ScoreUpdate]) -> ServiceResult<()> {
    let mut messages = Vec::new();
    for (index, update) in updates.iter().enumerate() {
        if update.score.is_none() {
            messages.push(format!("item {index}: score must not be null"));
        }
        if !update.student_email.as_deref().is_some_and(is_email_shaped) {
            messages.push(format!("item {index}: studentEmail must be a valid email"));
        }
    }
    reject_if_any(messages)
}

fn validate_letter_grade_batch(updates: &[EnrollmentGradeUpdate]) -> ServiceResult<()> {
    let messages = updates
        .iter()
        .enumerate()
        .filter(|(_, update)| !is_valid_letter_grade(update.grade.as_deref()))
        .map(|(index, _)| {
            format!(
                "item {index}: grade must be non-blank and at most {LETTER_GRADE_MAX_CHARS} characters"
            )
        })
        .collect();
    reject_if_any(messages)
}

fn reject_if_any(messages: Vec<String>) -> ServiceResult<()> {
    if messages.is_empty() {
        return Ok(());
    }
    warn!(
        "event=batch_validation module=service status=error invalid_items={}",
        messages.len()
    );
    Err(ServiceError::ValidationFailed(messages))
}

fn abort_batch(event: &str, index: usize, applied: usize, err: ServiceError) -> ServiceError {
    warn!(
        "event={} module=service status=error index={} applied={} code={}",
        event,
        index,
        applied,
        err.code()
    );
    ServiceError::BatchAborted {
        index,
        applied,
        source: Box::new(err),
    }
}
