//! Person repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the document-style operations (insert, find, find-one,
//!   find-one-and-update, find-one-and-remove, remove-many) over `people`.
//! - Keep SQL and JSON array handling inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `validate()` before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - "First match" always means insertion order (`rowid ASC`).

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::person::{NewPerson, Person, PersonId, PersonValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PEOPLE_TABLE: &str = "people";
const PEOPLE_COLUMNS: [&str; 4] = ["id", "name", "age", "favorite_foods"];

const PERSON_SELECT_SQL: &str = "SELECT id, name, age, favorite_foods FROM people";
const PERSON_SELECT_WITHOUT_AGE_SQL: &str =
    "SELECT id, name, NULL AS age, favorite_foods FROM people";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed validation before write.
    Validation(PersonValidationError),
    /// Underlying store/driver failure.
    Db(DbError),
    /// Target record does not exist.
    NotFound(PersonId),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// Coarse error taxonomy callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store unreachable, misconfigured or not bootstrapped.
    Connection,
    /// Required field missing or out of range.
    Validation,
    /// Lookup target does not exist.
    NotFound,
    /// Any other failure surfaced by the driver.
    Driver,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Driver => "driver",
        }
    }
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Db(DbError::Config(_))
            | Self::Db(DbError::UnsupportedSchemaVersion { .. })
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => ErrorKind::Connection,
            Self::Db(DbError::Sqlite(err)) if is_connection_failure(err) => ErrorKind::Connection,
            Self::Db(DbError::Sqlite(_)) | Self::InvalidData(_) => ErrorKind::Driver,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "person repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "person repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "person repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn is_connection_failure(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(
            rusqlite::ErrorCode::CannotOpen
                | rusqlite::ErrorCode::NotADatabase
                | rusqlite::ErrorCode::DatabaseBusy
                | rusqlite::ErrorCode::DatabaseLocked
        )
    )
}

/// Match conditions; every set field must match. Empty filter matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub id: Option<PersonId>,
    pub name: Option<String>,
    /// Matches when `favorite_foods` contains this exact value.
    pub favorite_food: Option<String>,
}

impl PersonFilter {
    pub fn by_id(id: PersonId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_favorite_food(food: impl Into<String>) -> Self {
        Self {
            favorite_food: Some(food.into()),
            ..Self::default()
        }
    }
}

/// Sort direction on `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSort {
    Ascending,
    Descending,
}

/// Query options for multi-record reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonQuery {
    pub filter: PersonFilter,
    /// Insertion order when `None`.
    pub sort_by_name: Option<NameSort>,
    pub limit: Option<u32>,
    /// Projects `age` out of every returned record.
    pub exclude_age: bool,
}

/// Field changes applied by `find_one_and_update`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonUpdate {
    pub set_age: Option<i64>,
}

impl PersonUpdate {
    pub fn with_age(age: i64) -> Self {
        Self { set_age: Some(age) }
    }

    fn apply_to(&self, person: &mut Person) {
        if let Some(age) = self.set_age {
            person.age = Some(age);
        }
    }
}

/// Outcome of a bulk removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

/// Repository interface for the `Person` collection.
pub trait PersonRepository {
    /// Validates, assigns an id and stores a new record.
    fn insert_person(&self, person: &NewPerson) -> RepoResult<Person>;
    /// Returns every record matching the query.
    fn find_people(&self, query: &PersonQuery) -> RepoResult<Vec<Person>>;
    /// Returns the first record matching the filter.
    fn find_one(&self, filter: &PersonFilter) -> RepoResult<Option<Person>>;
    /// Point lookup by id.
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Replaces the full stored record with the same id.
    fn save_person(&self, person: &Person) -> RepoResult<Person>;
    /// Updates the first match and returns its post-update state.
    fn find_one_and_update(
        &self,
        filter: &PersonFilter,
        update: &PersonUpdate,
    ) -> RepoResult<Option<Person>>;
    /// Deletes the first match and returns its prior state.
    fn find_one_and_remove(&self, filter: &PersonFilter) -> RepoResult<Option<Person>>;
    /// Deletes every match.
    fn remove_many(&self, filter: &PersonFilter) -> RepoResult<DeleteSummary>;
    /// Counts stored records.
    fn count_people(&self) -> RepoResult<u64>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_person_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_people(&self, query: &PersonQuery) -> RepoResult<Vec<Person>> {
        let select = if query.exclude_age {
            PERSON_SELECT_WITHOUT_AGE_SQL
        } else {
            PERSON_SELECT_SQL
        };
        let mut sql = format!("{select} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_filter(&query.filter, &mut sql, &mut bind_values);

        match query.sort_by_name {
            Some(NameSort::Ascending) => sql.push_str(" ORDER BY name ASC, rowid ASC"),
            Some(NameSort::Descending) => sql.push_str(" ORDER BY name DESC, rowid ASC"),
            None => sql.push_str(" ORDER BY rowid ASC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn first_match(&self, filter: &PersonFilter) -> RepoResult<Option<Person>> {
        let query = PersonQuery {
            filter: filter.clone(),
            limit: Some(1),
            ..PersonQuery::default()
        };
        Ok(self.query_people(&query)?.into_iter().next())
    }

    fn write_person(&self, person: &Person) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE people
             SET
                name = ?1,
                age = ?2,
                favorite_foods = ?3
             WHERE id = ?4;",
            params![
                person.name.as_str(),
                person.age,
                foods_to_db(&person.favorite_foods)?,
                person.id.to_string(),
            ],
        )?;
        Ok(changed)
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn insert_person(&self, person: &NewPerson) -> RepoResult<Person> {
        person.validate()?;

        let stored = Person::from_new(Uuid::new_v4(), person.clone());
        self.conn.execute(
            "INSERT INTO people (id, name, age, favorite_foods) VALUES (?1, ?2, ?3, ?4);",
            params![
                stored.id.to_string(),
                stored.name.as_str(),
                stored.age,
                foods_to_db(&stored.favorite_foods)?,
            ],
        )?;

        Ok(stored)
    }

    fn find_people(&self, query: &PersonQuery) -> RepoResult<Vec<Person>> {
        self.query_people(query)
    }

    fn find_one(&self, filter: &PersonFilter) -> RepoResult<Option<Person>> {
        self.first_match(filter)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        self.first_match(&PersonFilter::by_id(id))
    }

    fn save_person(&self, person: &Person) -> RepoResult<Person> {
        person.validate()?;

        if self.write_person(person)? == 0 {
            return Err(RepoError::NotFound(person.id));
        }

        Ok(person.clone())
    }

    fn find_one_and_update(
        &self,
        filter: &PersonFilter,
        update: &PersonUpdate,
    ) -> RepoResult<Option<Person>> {
        let tx = self.conn.unchecked_transaction()?;

        let Some(mut person) = self.first_match(filter)? else {
            return Ok(None);
        };
        update.apply_to(&mut person);
        person.validate()?;
        if self.write_person(&person)? == 0 {
            return Err(RepoError::NotFound(person.id));
        }

        tx.commit()?;
        Ok(Some(person))
    }

    fn find_one_and_remove(&self, filter: &PersonFilter) -> RepoResult<Option<Person>> {
        let tx = self.conn.unchecked_transaction()?;

        let Some(person) = self.first_match(filter)? else {
            return Ok(None);
        };
        self.conn
            .execute("DELETE FROM people WHERE id = ?1;", [person.id.to_string()])?;

        tx.commit()?;
        Ok(Some(person))
    }

    fn remove_many(&self, filter: &PersonFilter) -> RepoResult<DeleteSummary> {
        let mut sql = String::from("DELETE FROM people WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_filter(filter, &mut sql, &mut bind_values);

        let deleted = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(DeleteSummary {
            deleted_count: deleted as u64,
        })
    }

    fn count_people(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn push_filter(filter: &PersonFilter, sql: &mut String, bind_values: &mut Vec<Value>) {
    if let Some(id) = filter.id {
        sql.push_str(" AND id = ?");
        bind_values.push(Value::Text(id.to_string()));
    }
    if let Some(name) = &filter.name {
        sql.push_str(" AND name = ?");
        bind_values.push(Value::Text(name.clone()));
    }
    if let Some(food) = &filter.favorite_food {
        sql.push_str(
            " AND EXISTS (
                SELECT 1 FROM json_each(people.favorite_foods) AS food
                WHERE food.value = ?
            )",
        );
        bind_values.push(Value::Text(food.clone()));
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in people.id"))
    })?;

    let foods_text: String = row.get("favorite_foods")?;
    let favorite_foods = serde_json::from_str::<Vec<String>>(&foods_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid favorite_foods array for person {id}: {err}"
        ))
    })?;

    let person = Person {
        id,
        name: row.get("name")?,
        age: row.get("age")?,
        favorite_foods,
    };
    person.validate()?;
    Ok(person)
}

fn foods_to_db(foods: &[String]) -> RepoResult<String> {
    serde_json::to_string(foods)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode favorite_foods: {err}")))
}

fn ensure_person_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, PEOPLE_TABLE)? {
        return Err(RepoError::MissingRequiredTable(PEOPLE_TABLE));
    }

    for column in PEOPLE_COLUMNS {
        if !table_has_column(conn, PEOPLE_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: PEOPLE_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
