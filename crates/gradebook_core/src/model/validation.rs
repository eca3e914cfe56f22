//! Pure input validation for gradebook writes.
//!
//! # Invariants
//! - Titles are non-blank, at most `TITLE_MAX_CHARS` characters, and limited
//!   to ASCII letters, digits, period, comma and space (markup is rejected).
//! - Due dates are ISO calendar dates (`YYYY-MM-DD`) inside the section term.
//! - Emails only need the `local@domain.tld` shape; identity is verified
//!   upstream.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::academic::Term;

pub const TITLE_MAX_CHARS: usize = 250;
pub const LETTER_GRADE_MAX_CHARS: usize = 5;
const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9., ]+$").expect("valid title regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+@.+\..+$").expect("valid email regex"));

/// Rejected assignment title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    Missing,
    Blank,
    TooLong { chars: usize },
    DisallowedCharacters,
}

impl Display for TitleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "title is required"),
            Self::Blank => write!(f, "title must not be blank"),
            Self::TooLong { chars } => write!(
                f,
                "title has {chars} characters; at most {TITLE_MAX_CHARS} allowed"
            ),
            Self::DisallowedCharacters => write!(
                f,
                "title may only contain letters, digits, period, comma and space"
            ),
        }
    }
}

impl Error for TitleError {}

/// Rejected assignment due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDateError {
    Missing,
    Malformed(String),
    OutOfTerm {
        due_date: NaiveDate,
        term_start: NaiveDate,
        term_end: NaiveDate,
    },
}

impl Display for DueDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "due date is required"),
            Self::Malformed(value) => {
                write!(f, "due date `{value}` is not a YYYY-MM-DD calendar date")
            }
            Self::OutOfTerm {
                due_date,
                term_start,
                term_end,
            } => write!(
                f,
                "due date {due_date} is outside the term {term_start}..{term_end}"
            ),
        }
    }
}

impl Error for DueDateError {}

/// Validates an assignment title and returns it unchanged on success.
pub fn validate_title(title: Option<&str>) -> Result<String, TitleError> {
    let title = title.ok_or(TitleError::Missing)?;
    if title.trim().is_empty() {
        return Err(TitleError::Blank);
    }
    let chars = title.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(TitleError::TooLong { chars });
    }
    if !TITLE_RE.is_match(title) {
        return Err(TitleError::DisallowedCharacters);
    }
    Ok(title.to_string())
}

/// Parses due date text as a calendar date.
pub fn parse_due_date(text: Option<&str>) -> Result<NaiveDate, DueDateError> {
    let text = text.ok_or(DueDateError::Missing)?.trim();
    NaiveDate::parse_from_str(text, DUE_DATE_FORMAT)
        .map_err(|_| DueDateError::Malformed(text.to_string()))
}

/// Parses due date text and checks it against the inclusive term range.
pub fn due_date_within_term(text: Option<&str>, term: &Term) -> Result<NaiveDate, DueDateError> {
    let due_date = parse_due_date(text)?;
    if !term.contains(due_date) {
        return Err(DueDateError::OutOfTerm {
            due_date,
            term_start: term.start_date,
            term_end: term.end_date,
        });
    }
    Ok(due_date)
}

/// Returns whether `value` has the simple `local@domain.tld` shape.
pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Returns whether a submitted final letter grade is acceptable.
///
/// `None` clears the grade and is always accepted.
pub fn is_valid_letter_grade(grade: Option<&str>) -> bool {
    match grade {
        None => true,
        Some(value) => {
            let trimmed = value.trim();
            !trimmed.is_empty() && trimmed.chars().count() <= LETTER_GRADE_MAX_CHARS
        }
    }
}
