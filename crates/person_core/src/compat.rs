//! Completion-callback adapter over `PersonService`.
//!
//! # Responsibility
//! - Offer the legacy `done(data)` calling style for callers that were
//!   written against it.
//! - Funnel every outcome through one handler (`handle_result`).
//!
//! # Invariants
//! - On success `done` runs exactly once with the value.
//! - On failure the error is logged and `done` never runs. Callers that need
//!   to see failures use `PersonService` directly.
//! - `create_many` runs `done` once per stored record, not once overall.

use crate::logging::sanitize_message;
use crate::model::person::{NewPerson, Person, PersonId};
use crate::repo::person_repo::{DeleteSummary, PersonRepository, RepoResult};
use crate::service::person_service::PersonService;
use log::error;

const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// Routes `result` to `done` on success, logs and drops it on failure.
///
/// Returns whether `done` ran.
pub fn handle_result<T, F>(op: &'static str, result: RepoResult<T>, done: F) -> bool
where
    F: FnOnce(T),
{
    match result {
        Ok(value) => {
            done(value);
            true
        }
        Err(err) => {
            error!(
                "event=person_op module=compat op={} status=error error_kind={} error={}",
                op,
                err.kind().as_str(),
                sanitize_message(&err.to_string(), MAX_ERROR_MESSAGE_CHARS)
            );
            false
        }
    }
}

/// Callback-style facade; each method mirrors a `PersonService` operation.
pub struct CallbackPersonApi<R: PersonRepository> {
    service: PersonService<R>,
}

impl<R: PersonRepository> CallbackPersonApi<R> {
    pub fn new(service: PersonService<R>) -> Self {
        Self { service }
    }

    /// Returns the wrapped service for callers migrating off callbacks.
    pub fn service(&self) -> &PersonService<R> {
        &self.service
    }

    pub fn create<F: FnOnce(Person)>(&self, person: &NewPerson, done: F) -> bool {
        handle_result("create", self.service.create(person), done)
    }

    pub fn create_sample_person<F: FnOnce(Person)>(&self, done: F) -> bool {
        handle_result(
            "create_sample_person",
            self.service.create_sample_person(),
            done,
        )
    }

    /// Runs `done` once per stored record; returns how many times it ran.
    pub fn create_many<F: FnMut(Person)>(&self, people: &[NewPerson], mut done: F) -> usize {
        self.service
            .create_many(people)
            .into_iter()
            .map(|outcome| handle_result("create_many", outcome, &mut done))
            .filter(|ran| *ran)
            .count()
    }

    pub fn find_by_name<F: FnOnce(Vec<Person>)>(&self, name: &str, done: F) -> bool {
        handle_result("find_by_name", self.service.find_by_name(name), done)
    }

    pub fn find_by_favorite_food<F: FnOnce(Option<Person>)>(&self, food: &str, done: F) -> bool {
        handle_result(
            "find_by_favorite_food",
            self.service.find_by_favorite_food(food),
            done,
        )
    }

    pub fn find_by_id<F: FnOnce(Option<Person>)>(&self, id: PersonId, done: F) -> bool {
        handle_result("find_by_id", self.service.find_by_id(id), done)
    }

    pub fn find_and_append_food<F: FnOnce(Person)>(&self, id: PersonId, done: F) -> bool {
        handle_result(
            "find_and_append_food",
            self.service.find_and_append_food(id),
            done,
        )
    }

    pub fn find_and_set_age<F: FnOnce(Option<Person>)>(&self, name: &str, done: F) -> bool {
        handle_result("find_and_set_age", self.service.find_and_set_age(name), done)
    }

    pub fn remove_by_id<F: FnOnce(Option<Person>)>(&self, id: PersonId, done: F) -> bool {
        handle_result("remove_by_id", self.service.remove_by_id(id), done)
    }

    pub fn remove_by_name<F: FnOnce(DeleteSummary)>(&self, done: F) -> bool {
        handle_result("remove_by_name", self.service.remove_by_name(), done)
    }

    pub fn query_chain<F: FnOnce(Vec<Person>)>(&self, done: F) -> bool {
        handle_result("query_chain", self.service.query_chain(), done)
    }
}
