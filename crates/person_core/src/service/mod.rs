//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the collection's use-case APIs.
//! - Keep callers decoupled from storage details.

pub mod person_service;
