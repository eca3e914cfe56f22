//! Academic entities read and mutated by the gradebook core.
//!
//! # Responsibility
//! - Mirror the persisted shape of terms, courses, sections, users,
//!   enrollments, assignments and grades.
//! - Expose the owning `Section` of every instructor-scoped entity.
//!
//! # Invariants
//! - `Term::start_date <= Term::end_date`.
//! - An `Assignment` due date lies inside its section's term (enforced by the
//!   assignment service on every write).
//! - At most one `Grade` exists per `(assignment_id, enrollment_id)` pair.

use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

use crate::model::principal::Role;

/// Primary key of a section (`sectionNo`).
pub type SectionNo = i64;
/// Primary key of an assignment.
pub type AssignmentId = i64;
/// Primary key of an enrollment.
pub type EnrollmentId = i64;
/// Primary key of a grade row.
pub type GradeId = i64;
/// Primary key of a user.
pub type UserId = i64;

/// Entity kinds named in not-found and authorization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Section,
    Assignment,
    Enrollment,
    Grade,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Assignment => "assignment",
            Self::Enrollment => "enrollment",
            Self::Grade => "grade",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Academic term bounding every assignment due date beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub year: i32,
    pub semester: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Term {
    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Catalog course; immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub course_id: String,
    pub title: String,
    pub credits: i32,
}

/// One scheduled offering of a course in a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub section_no: SectionNo,
    /// Human-facing section number within the course (e.g. `1` of `cst334-1`).
    pub section_id: i32,
    /// Sole authorization anchor for instructor-scoped operations.
    pub instructor_email: String,
    pub building: String,
    pub room: String,
    pub times: String,
    pub term: Term,
    pub course: Course,
}

/// Registered user; used to resolve display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// A student's registration in a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    /// Final letter grade; `None` until the instructor submits one.
    pub grade: Option<String>,
    pub student: User,
    pub section: Section,
}

/// Gradable unit of work within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub assignment_id: AssignmentId,
    pub title: String,
    pub due_date: NaiveDate,
    /// Fixed at creation; updates never move an assignment between sections.
    pub section: Section,
}

/// Numeric score of one enrollment on one assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub grade_id: GradeId,
    pub score: Option<i32>,
    pub assignment: Assignment,
    pub enrollment_id: EnrollmentId,
}

/// Entities whose access is decided by the owning section's instructor.
pub trait InstructorScoped {
    fn owning_section(&self) -> &Section;
}

impl InstructorScoped for Section {
    fn owning_section(&self) -> &Section {
        self
    }
}

impl InstructorScoped for Assignment {
    fn owning_section(&self) -> &Section {
        &self.section
    }
}

impl InstructorScoped for Grade {
    fn owning_section(&self) -> &Section {
        self.assignment.owning_section()
    }
}

impl InstructorScoped for Enrollment {
    fn owning_section(&self) -> &Section {
        &self.section
    }
}
