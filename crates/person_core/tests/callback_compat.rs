#![cfg(feature = "callback-compat")]

use person_core::compat::handle_result;
use person_core::db::open_db_in_memory;
use person_core::{
    CallbackPersonApi, NewPerson, Person, PersonService, RepoError, SqlitePersonRepository,
};
use uuid::Uuid;

#[test]
fn handle_result_runs_done_only_on_success() {
    let mut seen = None;
    assert!(handle_result("test", Ok::<_, RepoError>(5), |value| seen = Some(value)));
    assert_eq!(seen, Some(5));

    let mut called = false;
    let ran = handle_result(
        "test",
        Err::<i32, _>(RepoError::NotFound(Uuid::nil())),
        |_| called = true,
    );
    assert!(!ran);
    assert!(!called);
}

#[test]
fn scenario_create_then_append_food_through_callbacks() {
    let conn = open_db_in_memory().unwrap();
    let api = CallbackPersonApi::new(PersonService::new(
        SqlitePersonRepository::try_new(&conn).unwrap(),
    ));

    let mut peter: Option<Person> = None;
    assert!(api.create_sample_person(|person| peter = Some(person)));
    let peter = peter.unwrap();

    let mut saved: Option<Person> = None;
    assert!(api.find_and_append_food(peter.id, |person| saved = Some(person)));
    assert_eq!(saved.unwrap().favorite_foods, vec!["Pizza", "hamburger"]);
}

#[test]
fn failed_operation_never_invokes_done() {
    let conn = open_db_in_memory().unwrap();
    let api = CallbackPersonApi::new(PersonService::new(
        SqlitePersonRepository::try_new(&conn).unwrap(),
    ));

    let mut called = false;
    assert!(!api.create(&NewPerson::new(""), |_| called = true));
    assert!(!api.find_and_append_food(Uuid::new_v4(), |_| called = true));
    assert!(!called);
}

#[test]
fn create_many_invokes_done_once_per_stored_record() {
    let conn = open_db_in_memory().unwrap();
    let api = CallbackPersonApi::new(PersonService::new(
        SqlitePersonRepository::try_new(&conn).unwrap(),
    ));

    let mut names = Vec::new();
    let ran = api.create_many(
        &[
            NewPerson::new("Ann"),
            NewPerson::new(""),
            NewPerson::new("Bob"),
        ],
        |person| names.push(person.name),
    );

    assert_eq!(ran, 2);
    assert_eq!(names, vec!["Ann", "Bob"]);
}

#[test]
fn not_found_lookups_still_complete_with_none() {
    let conn = open_db_in_memory().unwrap();
    let api = CallbackPersonApi::new(PersonService::new(
        SqlitePersonRepository::try_new(&conn).unwrap(),
    ));

    let mut result: Option<Option<Person>> = None;
    assert!(api.find_by_id(Uuid::new_v4(), |found| result = Some(found)));
    assert_eq!(result, Some(None));

    let mut removed = 99;
    assert!(api.remove_by_name(|summary| removed = summary.deleted_count));
    assert_eq!(removed, 0);

    let mut chained = None;
    assert!(api.query_chain(|people| chained = Some(people.len())));
    assert_eq!(chained, Some(0));
    assert_eq!(api.service().count().unwrap(), 0);
}
