//! Boundary records exchanged with the HTTP layer.
//!
//! Output records are flattened projections of the academic entities; input
//! records carry only the fields an operation reads and ignore the rest, so a
//! client may send back a full output record as an update.

use serde::{Deserialize, Serialize};

use crate::model::academic::{
    Assignment, AssignmentId, Enrollment, EnrollmentId, Grade, GradeId, Section, SectionNo,
    User, UserId,
};

/// Instructor view of one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    pub title: String,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub due_date: String,
    pub course_id: String,
    pub section_id: i32,
    pub section_no: SectionNo,
}

impl From<&Assignment> for AssignmentRecord {
    fn from(assignment: &Assignment) -> Self {
        Self {
            id: assignment.assignment_id,
            title: assignment.title.clone(),
            due_date: assignment.due_date.to_string(),
            course_id: assignment.section.course.course_id.clone(),
            section_id: assignment.section.section_id,
            section_no: assignment.section.section_no,
        }
    }
}

/// Student view of one assignment with the student's own score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentWithScoreRecord {
    pub id: AssignmentId,
    pub title: String,
    pub due_date: String,
    pub course_id: String,
    pub section_no: SectionNo,
    pub score: Option<i32>,
}

impl AssignmentWithScoreRecord {
    pub fn new(assignment: &Assignment, score: Option<i32>) -> Self {
        Self {
            id: assignment.assignment_id,
            title: assignment.title.clone(),
            due_date: assignment.due_date.to_string(),
            course_id: assignment.section.course.course_id.clone(),
            section_no: assignment.section.section_no,
            score,
        }
    }
}

/// One student's score on one assignment, as listed for the instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub grade_id: GradeId,
    pub student_name: String,
    pub student_email: String,
    pub assignment_title: String,
    pub course_id: String,
    pub section_id: i32,
    pub score: Option<i32>,
}

impl GradeRecord {
    pub fn new(grade: &Grade, student: &User) -> Self {
        Self {
            grade_id: grade.grade_id,
            student_name: student.name.clone(),
            student_email: student.email.clone(),
            assignment_title: grade.assignment.title.clone(),
            course_id: grade.assignment.section.course.course_id.clone(),
            section_id: grade.assignment.section.section_id,
            score: grade.score,
        }
    }
}

/// Enrollment with denormalized section, course and term display fields.
///
/// Also the payload of `updateEnrollment` registrar events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub enrollment_id: EnrollmentId,
    pub grade: Option<String>,
    pub student_id: UserId,
    pub student_name: String,
    pub student_email: String,
    pub course_id: String,
    pub course_title: String,
    pub section_id: i32,
    pub section_no: SectionNo,
    pub building: String,
    pub room: String,
    pub times: String,
    pub credits: i32,
    pub year: i32,
    pub semester: String,
}

impl From<&Enrollment> for EnrollmentRecord {
    fn from(enrollment: &Enrollment) -> Self {
        let section = &enrollment.section;
        Self {
            enrollment_id: enrollment.enrollment_id,
            grade: enrollment.grade.clone(),
            student_id: enrollment.student.id,
            student_name: enrollment.student.name.clone(),
            student_email: enrollment.student.email.clone(),
            course_id: section.course.course_id.clone(),
            course_title: section.course.title.clone(),
            section_id: section.section_id,
            section_no: section.section_no,
            building: section.building.clone(),
            room: section.room.clone(),
            times: section.times.clone(),
            credits: section.course.credits,
            year: section.term.year,
            semester: section.term.semester.clone(),
        }
    }
}

/// Section listed for its instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub section_no: SectionNo,
    pub year: i32,
    pub semester: String,
    pub course_id: String,
    pub course_title: String,
    pub section_id: i32,
    pub building: String,
    pub room: String,
    pub times: String,
    pub instructor_name: String,
    pub instructor_email: String,
}

impl SectionRecord {
    pub fn new(section: &Section, instructor_name: impl Into<String>) -> Self {
        Self {
            section_no: section.section_no,
            year: section.term.year,
            semester: section.term.semester.clone(),
            course_id: section.course.course_id.clone(),
            course_title: section.course.title.clone(),
            section_id: section.section_id,
            building: section.building.clone(),
            room: section.room.clone(),
            times: section.times.clone(),
            instructor_name: instructor_name.into(),
            instructor_email: section.instructor_email.clone(),
        }
    }
}

/// Input for creating an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub section_no: SectionNo,
}

impl NewAssignment {
    pub fn new(title: impl Into<String>, due_date: impl Into<String>, section_no: SectionNo) -> Self {
        Self {
            title: Some(title.into()),
            due_date: Some(due_date.into()),
            section_no,
        }
    }
}

/// Input for updating an assignment; only title and due date are mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUpdate {
    pub id: AssignmentId,
    pub title: Option<String>,
    pub due_date: Option<String>,
}

impl AssignmentUpdate {
    pub fn new(id: AssignmentId, title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            due_date: Some(due_date.into()),
        }
    }
}

/// One element of a score batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub grade_id: GradeId,
    pub score: Option<i32>,
    pub student_email: Option<String>,
}

impl From<&GradeRecord> for ScoreUpdate {
    fn from(record: &GradeRecord) -> Self {
        Self {
            grade_id: record.grade_id,
            score: record.score,
            student_email: Some(record.student_email.clone()),
        }
    }
}

/// One element of a final letter grade batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentGradeUpdate {
    pub enrollment_id: EnrollmentId,
    pub grade: Option<String>,
    pub section_no: SectionNo,
}

impl From<&EnrollmentRecord> for EnrollmentGradeUpdate {
    fn from(record: &EnrollmentRecord) -> Self {
        Self {
            enrollment_id: record.enrollment_id,
            grade: record.grade.clone(),
            section_no: record.section_no,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EnrollmentGradeUpdate, ScoreUpdate};

    #[test]
    fn score_update_accepts_full_grade_record_json() {
        let json = r#"{
            "gradeId": 7,
            "studentName": "sam",
            "studentEmail": "sam@csumb.edu",
            "assignmentTitle": "HW1",
            "courseId": "cst438",
            "sectionId": 1,
            "score": 88
        }"#;
        let update: ScoreUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.grade_id, 7);
        assert_eq!(update.score, Some(88));
        assert_eq!(update.student_email.as_deref(), Some("sam@csumb.edu"));
    }

    #[test]
    fn score_update_treats_null_score_as_missing() {
        let json = r#"{"gradeId": 7, "score": null, "studentEmail": "sam@csumb.edu"}"#;
        let update: ScoreUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.score, None);
    }

    #[test]
    fn enrollment_grade_update_ignores_display_fields() {
        let json = r#"{
            "enrollmentId": 3,
            "grade": "C",
            "studentId": 0,
            "studentName": null,
            "sectionNo": 1,
            "credits": 0
        }"#;
        let update: EnrollmentGradeUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.enrollment_id, 3);
        assert_eq!(update.grade.as_deref(), Some("C"));
        assert_eq!(update.section_no, 1);
    }
}
