//! Gradebook domain model.
//!
//! # Responsibility
//! - Define the entities the core reads and mutates (sections, assignments,
//!   enrollments, grades) and the principal acting on them.
//! - Define boundary records exchanged with the HTTP layer.
//! - Own pure validation rules (titles, due dates, emails, letter grades).
//!
//! # Invariants
//! - Every instructor-scoped entity resolves to exactly one owning `Section`.
//! - Boundary record field sets are stable; field names serialize camelCase.

pub mod academic;
pub mod principal;
pub mod records;
pub mod validation;
