//! Person domain model.
//!
//! # Responsibility
//! - Define the stored `Person` record and its insert payload.
//! - Keep the serialized field names aligned with the collection schema.
//!
//! # Invariants
//! - `name` is present and non-empty on every write.
//! - `id` is assigned once by the store and never changes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Collection name of the stored records.
pub const COLLECTION_NAME: &str = "Person";

/// Store-assigned identifier of a person record.
pub type PersonId = Uuid;

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// `name` is missing or empty.
    EmptyName,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "person validation failed: `name` is required"),
        }
    }
}

impl Error for PersonValidationError {}

/// Stored person record.
///
/// Serialized as `{"_id", "name", "age", "favoriteFoods"}`; `age` is left
/// out of the document when it is absent or projected away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: PersonId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(rename = "favoriteFoods", default)]
    pub favorite_foods: Vec<String>,
}

impl Person {
    /// Builds a stored record from an insert payload and its assigned id.
    pub fn from_new(id: PersonId, new: NewPerson) -> Self {
        Self {
            id,
            name: new.name,
            age: new.age,
            favorite_foods: new.favorite_foods,
        }
    }

    /// Checks record invariants before any write.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        validate_name(&self.name)
    }

    /// Appends one food to the end of `favorite_foods`.
    pub fn push_favorite_food(&mut self, food: impl Into<String>) {
        self.favorite_foods.push(food.into());
    }
}

/// Insert payload for a person record; the id is assigned on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(rename = "favoriteFoods", default)]
    pub favorite_foods: Vec<String>,
}

impl NewPerson {
    /// Creates a payload with only `name` set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            favorite_foods: Vec::new(),
        }
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_favorite_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    /// Checks record invariants before insert.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        validate_name(&self.name)
    }
}

fn validate_name(name: &str) -> Result<(), PersonValidationError> {
    if name.is_empty() {
        return Err(PersonValidationError::EmptyName);
    }
    Ok(())
}
