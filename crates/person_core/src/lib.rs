//! Core data access for the `Person` document collection.
//! This crate owns the record invariants and the store contract.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

#[cfg(feature = "callback-compat")]
pub mod compat;

#[cfg(feature = "callback-compat")]
pub use compat::CallbackPersonApi;
pub use config::{ConfigError, LogConfig, StoreConfig, StoreLocation, STORE_URI_ENV};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{NewPerson, Person, PersonId, PersonValidationError, COLLECTION_NAME};
pub use repo::person_repo::{
    DeleteSummary, ErrorKind, NameSort, PersonFilter, PersonQuery, PersonRepository,
    PersonUpdate, RepoError, RepoResult, SqlitePersonRepository,
};
pub use service::person_service::{
    PersonService, AGE_TO_SET, FOOD_TO_ADD, FOOD_TO_SEARCH, NAME_TO_REMOVE,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
