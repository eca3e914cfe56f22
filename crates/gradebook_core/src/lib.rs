//! University gradebook domain-consistency layer.
//!
//! Decides who may read or mutate which assignment, grade, and enrollment,
//! keeps grade rows consistent with assignments and enrollments, and hands
//! final grade changes to the registrar.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod registrar;
pub mod repo;
pub mod service;

pub use config::{ConfigError, GradebookConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::principal::{Principal, Role};
pub use registrar::{NoopSink, NotificationSink, RecordingSink, RegistrarEvent, RegistrarOutbox};
pub use repo::{RepoError, SqliteGradebookStore};
pub use service::{
    AssignmentService, EnrollmentGradeSync, GradeMaterializer, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
