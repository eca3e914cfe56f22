//! Gradebook use-case services.
//!
//! # Responsibility
//! - Enforce role capability, then section ownership, before touching data.
//! - Orchestrate store calls into instructor and student operations.
//! - Keep the HTTP layer decoupled from storage and messaging details.

pub mod assignment_service;
pub mod error;
pub mod grade_service;
pub mod grade_sync;
pub mod ownership;

pub use assignment_service::AssignmentService;
pub use error::{AuthorizationFailure, ServiceError, ServiceResult};
pub use grade_service::{score_for, GradeMaterializer};
pub use grade_sync::EnrollmentGradeSync;
pub use ownership::{authorize_instructor, require_role, Ownership};
