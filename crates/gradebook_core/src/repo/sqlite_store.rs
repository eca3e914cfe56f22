//! SQLite-backed gradebook store and shared row mapping.
//!
//! # Invariants
//! - The borrowed connection is migrated to `latest_version()`; `try_new`
//!   refuses anything else.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_version, latest_version};
use crate::model::academic::{Assignment, Course, Enrollment, Grade, Section, Term, User};
use crate::model::principal::Role;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{Connection, Row};

macro_rules! section_columns {
    () => {
        "s.section_no, s.section_id, s.instructor_email, s.building, s.room, s.times,
         t.year, t.semester, t.start_date, t.end_date,
         c.course_id, c.title AS course_title, c.credits"
    };
}

macro_rules! section_joins {
    () => {
        " INNER JOIN terms t ON t.term_id = s.term_id
          INNER JOIN courses c ON c.course_id = s.course_id"
    };
}

pub(crate) const SECTION_SELECT_SQL: &str = concat!(
    "SELECT ",
    section_columns!(),
    " FROM sections s",
    section_joins!()
);

pub(crate) const ASSIGNMENT_SELECT_SQL: &str = concat!(
    "SELECT a.assignment_id, a.title AS assignment_title, a.due_date, ",
    section_columns!(),
    " FROM assignments a
      INNER JOIN sections s ON s.section_no = a.section_no",
    section_joins!()
);

pub(crate) const ENROLLMENT_SELECT_SQL: &str = concat!(
    "SELECT e.enrollment_id, e.grade AS letter_grade,
            u.id AS user_id, u.name AS user_name, u.email AS user_email, u.role AS user_role, ",
    section_columns!(),
    " FROM enrollments e
      INNER JOIN users u ON u.id = e.student_id
      INNER JOIN sections s ON s.section_no = e.section_no",
    section_joins!()
);

pub(crate) const GRADE_SELECT_SQL: &str = concat!(
    "SELECT g.grade_id, g.score, g.enrollment_id,
            a.assignment_id, a.title AS assignment_title, a.due_date, ",
    section_columns!(),
    " FROM grades g
      INNER JOIN assignments a ON a.assignment_id = g.assignment_id
      INNER JOIN sections s ON s.section_no = a.section_no",
    section_joins!()
);

/// Gradebook entity store over one migrated SQLite connection.
///
/// Cheap to copy; services that need their own handle take a copy.
#[derive(Clone, Copy)]
pub struct SqliteGradebookStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGradebookStore<'conn> {
    /// Constructs a store from a connection returned by `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

pub(crate) fn parse_section_row(row: &Row<'_>) -> RepoResult<Section> {
    Ok(Section {
        section_no: row.get("section_no")?,
        section_id: row.get("section_id")?,
        instructor_email: row.get("instructor_email")?,
        building: row.get("building")?,
        room: row.get("room")?,
        times: row.get("times")?,
        term: Term {
            year: row.get("year")?,
            semester: row.get("semester")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
        },
        course: Course {
            course_id: row.get("course_id")?,
            title: row.get("course_title")?,
            credits: row.get("credits")?,
        },
    })
}

pub(crate) fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let role_text: String = row.get("user_role")?;
    let role = role_text.parse::<Role>().map_err(|_| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in users.role"))
    })?;
    Ok(User {
        id: row.get("user_id")?,
        name: row.get("user_name")?,
        email: row.get("user_email")?,
        role,
    })
}

pub(crate) fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    Ok(Assignment {
        assignment_id: row.get("assignment_id")?,
        title: row.get("assignment_title")?,
        due_date: row.get("due_date")?,
        section: parse_section_row(row)?,
    })
}

pub(crate) fn parse_enrollment_row(row: &Row<'_>) -> RepoResult<Enrollment> {
    let student = parse_user_row(row)?;
    Ok(Enrollment {
        enrollment_id: row.get("enrollment_id")?,
        grade: row.get("letter_grade")?,
        student,
        section: parse_section_row(row)?,
    })
}

pub(crate) fn parse_grade_row(row: &Row<'_>) -> RepoResult<Grade> {
    Ok(Grade {
        grade_id: row.get("grade_id")?,
        score: row.get("score")?,
        assignment: parse_assignment_row(row)?,
        enrollment_id: row.get("enrollment_id")?,
    })
}
