//! Domain model for the `Person` collection.
//!
//! # Responsibility
//! - Define the canonical record shape stored in the collection.
//! - Own record-level validation shared by every write path.
//!
//! # Invariants
//! - Every stored record is identified by a store-assigned `PersonId`.
//! - Removal is a hard delete; there are no tombstones.

pub mod person;
