//! Entity store contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define point-lookup and small-scan contracts the services consume.
//! - Isolate SQL details from ownership and consistency rules.
//!
//! # Invariants
//! - Repositories never authorize; they return whatever exists.
//! - Write APIs return semantic errors (`NotFound`, `Conflict`) in addition
//!   to transport errors.
//! - Each write is committed on return; callers compose per-row commits.

pub mod assignment_repo;
pub mod enrollment_repo;
pub mod error;
pub mod grade_repo;
pub mod section_repo;
pub mod sqlite_store;

pub use assignment_repo::AssignmentRepository;
pub use enrollment_repo::EnrollmentRepository;
pub use error::{RepoError, RepoResult};
pub use grade_repo::GradeRepository;
pub use section_repo::SectionRepository;
pub use sqlite_store::SqliteGradebookStore;
