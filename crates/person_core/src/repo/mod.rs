//! Repository layer contracts and persistence implementations.
//!
//! # Responsibility
//! - Define document-style data access contracts for the `Person` collection.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `validate()` before persistence.
//! - Lookups report absence as `Ok(None)`; only writes that target a
//!   specific id return `RepoError::NotFound`.

pub mod person_repo;
