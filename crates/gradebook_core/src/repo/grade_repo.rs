//! Grade persistence.
//!
//! # Invariants
//! - `UNIQUE(assignment_id, enrollment_id)` is enforced by the schema;
//!   `insert_grade` reports a lost race as `RepoError::Conflict`.
//! - New grades start with a null score.

use crate::db::DbError;
use crate::model::academic::{AssignmentId, EntityKind, EnrollmentId, Grade, GradeId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::sqlite_store::{parse_grade_row, SqliteGradebookStore, GRADE_SELECT_SQL};
use rusqlite::params;

pub trait GradeRepository {
    fn find_grade(&self, grade_id: GradeId) -> RepoResult<Option<Grade>>;
    fn find_grade_by_student_and_assignment(
        &self,
        student_email: &str,
        assignment_id: AssignmentId,
    ) -> RepoResult<Option<Grade>>;
    fn find_grade_by_enrollment_and_assignment(
        &self,
        enrollment_id: EnrollmentId,
        assignment_id: AssignmentId,
    ) -> RepoResult<Option<Grade>>;
    /// Inserts an unscored grade row for the pair.
    fn insert_grade(
        &self,
        assignment_id: AssignmentId,
        enrollment_id: EnrollmentId,
    ) -> RepoResult<GradeId>;
    fn update_grade_score(&self, grade_id: GradeId, score: i32) -> RepoResult<()>;
}

impl GradeRepository for SqliteGradebookStore<'_> {
    fn find_grade(&self, grade_id: GradeId) -> RepoResult<Option<Grade>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{GRADE_SELECT_SQL} WHERE g.grade_id = ?1;"))?;
        let mut rows = stmt.query([grade_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_grade_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_grade_by_student_and_assignment(
        &self,
        student_email: &str,
        assignment_id: AssignmentId,
    ) -> RepoResult<Option<Grade>> {
        let mut stmt = self.conn().prepare(&format!(
            "{GRADE_SELECT_SQL}
             INNER JOIN enrollments e ON e.enrollment_id = g.enrollment_id
             INNER JOIN users u ON u.id = e.student_id
             WHERE u.email = ?1
               AND g.assignment_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![student_email, assignment_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_grade_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_grade_by_enrollment_and_assignment(
        &self,
        enrollment_id: EnrollmentId,
        assignment_id: AssignmentId,
    ) -> RepoResult<Option<Grade>> {
        let mut stmt = self.conn().prepare(&format!(
            "{GRADE_SELECT_SQL}
             WHERE g.enrollment_id = ?1
               AND g.assignment_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![enrollment_id, assignment_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_grade_row(row)?)),
            None => Ok(None),
        }
    }

    fn insert_grade(
        &self,
        assignment_id: AssignmentId,
        enrollment_id: EnrollmentId,
    ) -> RepoResult<GradeId> {
        let inserted = self.conn().execute(
            "INSERT INTO grades (assignment_id, enrollment_id, score) VALUES (?1, ?2, NULL);",
            params![assignment_id, enrollment_id],
        );
        match inserted {
            Ok(_) => Ok(self.conn().last_insert_rowid()),
            Err(err) => {
                let err = DbError::from(err);
                if err.is_unique_violation() {
                    return Err(RepoError::Conflict {
                        entity: EntityKind::Grade,
                        detail: format!(
                            "assignment {assignment_id} enrollment {enrollment_id}"
                        ),
                    });
                }
                Err(err.into())
            }
        }
    }

    fn update_grade_score(&self, grade_id: GradeId, score: i32) -> RepoResult<()> {
        let changed = self.conn().execute(
            "UPDATE grades SET score = ?2 WHERE grade_id = ?1;",
            params![grade_id, score],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Grade,
                id: grade_id,
            });
        }
        Ok(())
    }
}
