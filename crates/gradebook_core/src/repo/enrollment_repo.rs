//! Enrollment lookups and final letter grade writes.
//!
//! Enrollments are created by registration; this store only reads them and
//! updates `grade`.

use crate::model::academic::{EntityKind, Enrollment, EnrollmentId, SectionNo};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::sqlite_store::{parse_enrollment_row, SqliteGradebookStore, ENROLLMENT_SELECT_SQL};
use rusqlite::params;

pub trait EnrollmentRepository {
    fn find_enrollment(&self, enrollment_id: EnrollmentId) -> RepoResult<Option<Enrollment>>;
    /// Section roster ordered by student name (ties by enrollment id).
    fn find_enrollments_by_section_order_by_student_name(
        &self,
        section_no: SectionNo,
    ) -> RepoResult<Vec<Enrollment>>;
    fn update_enrollment_grade(
        &self,
        enrollment_id: EnrollmentId,
        grade: Option<&str>,
    ) -> RepoResult<()>;
}

impl EnrollmentRepository for SqliteGradebookStore<'_> {
    fn find_enrollment(&self, enrollment_id: EnrollmentId) -> RepoResult<Option<Enrollment>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{ENROLLMENT_SELECT_SQL} WHERE e.enrollment_id = ?1;"))?;
        let mut rows = stmt.query([enrollment_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_enrollment_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_enrollments_by_section_order_by_student_name(
        &self,
        section_no: SectionNo,
    ) -> RepoResult<Vec<Enrollment>> {
        let mut stmt = self.conn().prepare(&format!(
            "{ENROLLMENT_SELECT_SQL}
             WHERE e.section_no = ?1
             ORDER BY u.name ASC, e.enrollment_id ASC;"
        ))?;
        let mut rows = stmt.query([section_no])?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next()? {
            enrollments.push(parse_enrollment_row(row)?);
        }
        Ok(enrollments)
    }

    fn update_enrollment_grade(
        &self,
        enrollment_id: EnrollmentId,
        grade: Option<&str>,
    ) -> RepoResult<()> {
        let changed = self.conn().execute(
            "UPDATE enrollments SET grade = ?2 WHERE enrollment_id = ?1;",
            params![enrollment_id, grade],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Enrollment,
                id: enrollment_id,
            });
        }
        Ok(())
    }
}
