#![allow(dead_code)]

use gradebook_core::model::academic::{AssignmentId, SectionNo};
use gradebook_core::Principal;
use rusqlite::{params, Connection};

pub const INSTRUCTOR: &str = "dwisneski@csumb.edu";
pub const INSTRUCTOR_NAME: &str = "David Wisneski";
pub const OTHER_INSTRUCTOR: &str = "jgross@csumb.edu";
pub const STUDENT_SAM: &str = "sama@csumb.edu";
pub const STUDENT_BOB: &str = "bobb@csumb.edu";

/// cst438, Spring 2025 (2025-01-01..2025-05-01), taught by `INSTRUCTOR`.
pub const OWN_SECTION: SectionNo = 1;
/// cst363, Spring 2025, taught by `OTHER_INSTRUCTOR`.
pub const OTHER_SECTION: SectionNo = 2;
/// cst438, Fall 2025, taught by `INSTRUCTOR`, no enrollments.
pub const OWN_FALL_SECTION: SectionNo = 3;

/// Sam in `OWN_SECTION`.
pub const SAM_OWN_ENROLLMENT: i64 = 1;
/// Bob in `OWN_SECTION`.
pub const BOB_OWN_ENROLLMENT: i64 = 2;
/// Sam in `OTHER_SECTION`.
pub const SAM_OTHER_ENROLLMENT: i64 = 3;

/// Assignment in `OTHER_SECTION`, due 2025-02-15.
pub const OTHER_ASSIGNMENT: AssignmentId = 1;

pub fn instructor() -> Principal {
    Principal::instructor(INSTRUCTOR)
}

pub fn other_instructor() -> Principal {
    Principal::instructor(OTHER_INSTRUCTOR)
}

pub fn sam() -> Principal {
    Principal::student(STUDENT_SAM)
}

pub fn bob() -> Principal {
    Principal::student(STUDENT_BOB)
}

/// Seeds registration-owned reference data.
pub fn seed(conn: &Connection) {
    conn.execute_batch(
        "INSERT INTO users (id, name, email, role) VALUES
            (1, 'David Wisneski', 'dwisneski@csumb.edu', 'INSTRUCTOR'),
            (2, 'Joshua Gross', 'jgross@csumb.edu', 'INSTRUCTOR'),
            (3, 'Sam Adams', 'sama@csumb.edu', 'STUDENT'),
            (4, 'Bob Brown', 'bobb@csumb.edu', 'STUDENT'),
            (5, 'Admin', 'admin@csumb.edu', 'ADMIN');

         INSERT INTO terms (term_id, year, semester, start_date, end_date) VALUES
            (1, 2025, 'Spring', '2025-01-01', '2025-05-01'),
            (2, 2025, 'Fall', '2025-08-20', '2025-12-17');

         INSERT INTO courses (course_id, title, credits) VALUES
            ('cst438', 'Software Engineering', 4),
            ('cst363', 'Introduction to Database', 4);

         INSERT INTO sections (section_no, course_id, term_id, section_id, building, room, times, instructor_email) VALUES
            (1, 'cst438', 1, 1, '052', '104', 'M W 10:00-11:50', 'dwisneski@csumb.edu'),
            (2, 'cst363', 1, 1, '052', '222', 'T Th 12:00-1:50', 'jgross@csumb.edu'),
            (3, 'cst438', 2, 1, '052', '104', 'M W 10:00-11:50', 'dwisneski@csumb.edu');

         INSERT INTO enrollments (enrollment_id, grade, student_id, section_no) VALUES
            (1, NULL, 3, 1),
            (2, NULL, 4, 1),
            (3, NULL, 3, 2);

         INSERT INTO assignments (assignment_id, section_no, title, due_date) VALUES
            (1, 2, 'db homework 1', '2025-02-15');",
    )
    .unwrap();
}

pub fn insert_assignment(
    conn: &Connection,
    section_no: SectionNo,
    title: &str,
    due_date: &str,
) -> AssignmentId {
    conn.execute(
        "INSERT INTO assignments (section_no, title, due_date) VALUES (?1, ?2, ?3);",
        params![section_no, title, due_date],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn grade_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM grades;", [], |row| row.get(0))
        .unwrap()
}

pub fn grade_count_for(conn: &Connection, assignment_id: AssignmentId) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM grades WHERE assignment_id = ?1;",
        [assignment_id],
        |row| row.get(0),
    )
    .unwrap()
}

pub fn letter_grade(conn: &Connection, enrollment_id: i64) -> Option<String> {
    conn.query_row(
        "SELECT grade FROM enrollments WHERE enrollment_id = ?1;",
        [enrollment_id],
        |row| row.get(0),
    )
    .unwrap()
}
