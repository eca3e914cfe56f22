//! Authenticated caller identity.
//!
//! The credential itself is validated outside the core; this module only
//! carries the resulting email and role claim.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Prefix used by bearer-token scope claims (`SCOPE_ROLE_INSTRUCTOR`).
const SCOPE_PREFIX: &str = "SCOPE_ROLE_";

/// Role claim granted to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    /// Stable storage/claim spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Instructor => "INSTRUCTOR",
            Self::Student => "STUDENT",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role claim could not be recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleParseError(pub String);

impl Display for RoleParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported role claim: `{}`", self.0)
    }
}

impl Error for RoleParseError {}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let upper = trimmed.to_ascii_uppercase();
        let bare = upper.strip_prefix(SCOPE_PREFIX).unwrap_or(upper.as_str());
        match bare {
            "ADMIN" => Ok(Self::Admin),
            "INSTRUCTOR" => Ok(Self::Instructor),
            "STUDENT" => Ok(Self::Student),
            _ => Err(RoleParseError(trimmed.to_string())),
        }
    }
}

/// The caller of a core operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Login email; the authorization anchor compared with
    /// `Section::instructor_email`.
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    pub fn instructor(email: impl Into<String>) -> Self {
        Self::new(email, Role::Instructor)
    }

    pub fn student(email: impl Into<String>) -> Self {
        Self::new(email, Role::Student)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::{Principal, Role, RoleParseError};

    #[test]
    fn parses_bare_and_scoped_role_claims() {
        assert_eq!("INSTRUCTOR".parse::<Role>(), Ok(Role::Instructor));
        assert_eq!("student".parse::<Role>(), Ok(Role::Student));
        assert_eq!("SCOPE_ROLE_ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" scope_role_student ".parse::<Role>(), Ok(Role::Student));
    }

    #[test]
    fn rejects_unknown_role_claim() {
        assert_eq!(
            "SCOPE_ROLE_REGISTRAR".parse::<Role>(),
            Err(RoleParseError("SCOPE_ROLE_REGISTRAR".to_string()))
        );
    }

    #[test]
    fn principal_constructors_set_role() {
        assert!(Principal::instructor("ted@csumb.edu").has_role(Role::Instructor));
        assert!(!Principal::student("sam@csumb.edu").has_role(Role::Instructor));
    }
}
