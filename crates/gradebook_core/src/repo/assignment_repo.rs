//! Assignment persistence.
//!
//! # Invariants
//! - `update_assignment` never changes the owning section.
//! - `delete_assignment` removes the assignment's grades in the same
//!   transaction.
//! - Student listings are ordered by `due_date ASC, assignment_id ASC`.

use crate::model::academic::{Assignment, AssignmentId, EntityKind, SectionNo};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::sqlite_store::{parse_assignment_row, SqliteGradebookStore, ASSIGNMENT_SELECT_SQL};
use chrono::NaiveDate;
use rusqlite::params;

pub trait AssignmentRepository {
    fn find_assignment(&self, assignment_id: AssignmentId) -> RepoResult<Option<Assignment>>;
    fn find_assignments_by_section(&self, section_no: SectionNo) -> RepoResult<Vec<Assignment>>;
    /// Assignments of every section `student_email` is enrolled in for one
    /// term, ordered by ascending due date.
    fn find_assignments_by_student_and_term(
        &self,
        student_email: &str,
        year: i32,
        semester: &str,
    ) -> RepoResult<Vec<Assignment>>;
    fn insert_assignment(
        &self,
        section_no: SectionNo,
        title: &str,
        due_date: NaiveDate,
    ) -> RepoResult<AssignmentId>;
    fn update_assignment(
        &self,
        assignment_id: AssignmentId,
        title: &str,
        due_date: NaiveDate,
    ) -> RepoResult<()>;
    /// Deletes the assignment and its grades; returns the number of grades
    /// removed.
    fn delete_assignment(&self, assignment_id: AssignmentId) -> RepoResult<usize>;
}

impl AssignmentRepository for SqliteGradebookStore<'_> {
    fn find_assignment(&self, assignment_id: AssignmentId) -> RepoResult<Option<Assignment>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} WHERE a.assignment_id = ?1;"))?;
        let mut rows = stmt.query([assignment_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_assignment_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_assignments_by_section(&self, section_no: SectionNo) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn().prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE a.section_no = ?1
             ORDER BY a.due_date ASC, a.assignment_id ASC;"
        ))?;
        let mut rows = stmt.query([section_no])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assignment_row(row)?);
        }
        Ok(assignments)
    }

    fn find_assignments_by_student_and_term(
        &self,
        student_email: &str,
        year: i32,
        semester: &str,
    ) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn().prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE t.year = ?2
               AND t.semester = ?3
               AND EXISTS (
                    SELECT 1
                    FROM enrollments e
                    INNER JOIN users u ON u.id = e.student_id
                    WHERE e.section_no = a.section_no
                      AND u.email = ?1
               )
             ORDER BY a.due_date ASC, a.assignment_id ASC;"
        ))?;
        let mut rows = stmt.query(params![student_email, year, semester])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assignment_row(row)?);
        }
        Ok(assignments)
    }

    fn insert_assignment(
        &self,
        section_no: SectionNo,
        title: &str,
        due_date: NaiveDate,
    ) -> RepoResult<AssignmentId> {
        self.conn().execute(
            "INSERT INTO assignments (section_no, title, due_date) VALUES (?1, ?2, ?3);",
            params![section_no, title, due_date],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    fn update_assignment(
        &self,
        assignment_id: AssignmentId,
        title: &str,
        due_date: NaiveDate,
    ) -> RepoResult<()> {
        let changed = self.conn().execute(
            "UPDATE assignments SET title = ?2, due_date = ?3 WHERE assignment_id = ?1;",
            params![assignment_id, title, due_date],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Assignment,
                id: assignment_id,
            });
        }
        Ok(())
    }

    fn delete_assignment(&self, assignment_id: AssignmentId) -> RepoResult<usize> {
        let tx = self.conn().unchecked_transaction()?;
        let grades_removed =
            tx.execute("DELETE FROM grades WHERE assignment_id = ?1;", [assignment_id])?;
        let changed = tx.execute(
            "DELETE FROM assignments WHERE assignment_id = ?1;",
            [assignment_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Assignment,
                id: assignment_id,
            });
        }
        tx.commit()?;
        Ok(grades_removed)
    }
}
