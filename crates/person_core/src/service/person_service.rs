//! Person use-case service.
//!
//! # Responsibility
//! - Expose the collection operations callers use (create, find, edit,
//!   update, remove, chained query).
//! - Return every outcome as an explicit `RepoResult`; nothing is swallowed.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Fixed operation values live in the constants below.
//! - `create_many` reports one outcome per input, in input order.

use crate::model::person::{NewPerson, Person, PersonId, COLLECTION_NAME};
use crate::repo::person_repo::{
    DeleteSummary, NameSort, PersonFilter, PersonQuery, PersonRepository, PersonUpdate,
    RepoError, RepoResult,
};
use log::{debug, warn};

/// Food appended by `find_and_append_food`.
pub const FOOD_TO_ADD: &str = "hamburger";
/// Age written by `find_and_set_age`.
pub const AGE_TO_SET: i64 = 20;
/// Name removed by `remove_by_name`.
pub const NAME_TO_REMOVE: &str = "Mary";
/// Favorite food filtered on by `query_chain`.
pub const FOOD_TO_SEARCH: &str = "burrito";

const QUERY_CHAIN_LIMIT: u32 = 2;

/// Use-case service over a `PersonRepository`.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new record and returns it with its assigned id.
    pub fn create(&self, person: &NewPerson) -> RepoResult<Person> {
        observe("create", self.repo.insert_person(person))
    }

    /// Stores the sample record `Peter, 24, ["Pizza"]`.
    pub fn create_sample_person(&self) -> RepoResult<Person> {
        let peter = NewPerson::new("Peter")
            .with_age(24)
            .with_favorite_foods(["Pizza"]);
        self.create(&peter)
    }

    /// Inserts each record independently.
    ///
    /// A failed insert does not stop the rest; each slot carries its own
    /// outcome.
    pub fn create_many(&self, people: &[NewPerson]) -> Vec<RepoResult<Person>> {
        people
            .iter()
            .map(|person| observe("create_many", self.repo.insert_person(person)))
            .collect()
    }

    /// All records whose name equals `name`, in insertion order.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Vec<Person>> {
        let query = PersonQuery {
            filter: PersonFilter::by_name(name),
            ..PersonQuery::default()
        };
        observe("find_by_name", self.repo.find_people(&query))
    }

    /// First record whose `favorite_foods` contains `food`.
    pub fn find_by_favorite_food(&self, food: &str) -> RepoResult<Option<Person>> {
        observe(
            "find_by_favorite_food",
            self.repo.find_one(&PersonFilter::by_favorite_food(food)),
        )
    }

    pub fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        observe("find_by_id", self.repo.get_person(id))
    }

    /// Loads the record, appends `FOOD_TO_ADD` and saves the whole record.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when `id` does not resolve.
    pub fn find_and_append_food(&self, id: PersonId) -> RepoResult<Person> {
        let result = self
            .repo
            .get_person(id)
            .and_then(|found| found.ok_or(RepoError::NotFound(id)))
            .and_then(|mut person| {
                person.push_favorite_food(FOOD_TO_ADD);
                self.repo.save_person(&person)
            });
        observe("find_and_append_food", result)
    }

    /// Sets `age = AGE_TO_SET` on the first record named `name`.
    ///
    /// Returns the post-update record, or `None` when nothing matched.
    pub fn find_and_set_age(&self, name: &str) -> RepoResult<Option<Person>> {
        observe(
            "find_and_set_age",
            self.repo.find_one_and_update(
                &PersonFilter::by_name(name),
                &PersonUpdate::with_age(AGE_TO_SET),
            ),
        )
    }

    /// Deletes the record and returns its prior state.
    pub fn remove_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        observe(
            "remove_by_id",
            self.repo.find_one_and_remove(&PersonFilter::by_id(id)),
        )
    }

    /// Deletes every record named `NAME_TO_REMOVE`.
    pub fn remove_by_name(&self) -> RepoResult<DeleteSummary> {
        self.remove_people_named(NAME_TO_REMOVE)
    }

    /// Deletes every record named `name`.
    pub fn remove_people_named(&self, name: &str) -> RepoResult<DeleteSummary> {
        observe(
            "remove_by_name",
            self.repo.remove_many(&PersonFilter::by_name(name)),
        )
    }

    /// Records liking `FOOD_TO_SEARCH`, sorted by name, first two, without `age`.
    pub fn query_chain(&self) -> RepoResult<Vec<Person>> {
        let query = PersonQuery {
            filter: PersonFilter::by_favorite_food(FOOD_TO_SEARCH),
            sort_by_name: Some(NameSort::Ascending),
            limit: Some(QUERY_CHAIN_LIMIT),
            exclude_age: true,
        };
        observe("query_chain", self.repo.find_people(&query))
    }

    pub fn count(&self) -> RepoResult<u64> {
        observe("count", self.repo.count_people())
    }
}

fn observe<T>(op: &'static str, result: RepoResult<T>) -> RepoResult<T> {
    match &result {
        Ok(_) => debug!(
            "event=person_op module=service collection={COLLECTION_NAME} op={op} status=ok"
        ),
        Err(err) => warn!(
            "event=person_op module=service collection={} op={} status=error error_kind={}",
            COLLECTION_NAME,
            op,
            err.kind().as_str()
        ),
    }
    result
}
