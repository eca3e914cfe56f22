//! Section and user lookups.

use crate::model::academic::{Section, SectionNo, User};
use crate::repo::error::RepoResult;
use crate::repo::sqlite_store::{
    parse_section_row, parse_user_row, SqliteGradebookStore, SECTION_SELECT_SQL,
};
use rusqlite::params;

/// Read-only access to sections and the users who teach or attend them.
pub trait SectionRepository {
    fn find_section(&self, section_no: SectionNo) -> RepoResult<Option<Section>>;
    /// Sections taught by `instructor_email` in one term, by section number.
    fn find_sections_by_instructor_and_term(
        &self,
        instructor_email: &str,
        year: i32,
        semester: &str,
    ) -> RepoResult<Vec<Section>>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

impl SectionRepository for SqliteGradebookStore<'_> {
    fn find_section(&self, section_no: SectionNo) -> RepoResult<Option<Section>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SECTION_SELECT_SQL} WHERE s.section_no = ?1;"))?;
        let mut rows = stmt.query([section_no])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_section_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_sections_by_instructor_and_term(
        &self,
        instructor_email: &str,
        year: i32,
        semester: &str,
    ) -> RepoResult<Vec<Section>> {
        let mut stmt = self.conn().prepare(&format!(
            "{SECTION_SELECT_SQL}
             WHERE s.instructor_email = ?1
               AND t.year = ?2
               AND t.semester = ?3
             ORDER BY s.section_no ASC;"
        ))?;
        let mut rows = stmt.query(params![instructor_email, year, semester])?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            sections.push(parse_section_row(row)?);
        }
        Ok(sections)
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut stmt = self.conn().prepare(
            "SELECT id AS user_id, name AS user_name, email AS user_email, role AS user_role
             FROM users
             WHERE email = ?1;",
        )?;
        let mut rows = stmt.query([email])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }
}
