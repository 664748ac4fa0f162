use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use geocore_core::{Entity, PersonId};
use geocore_people::{Person, PersonPatch};

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /people`, `POST /people/:id` and `PUT /people/:id`.
///
/// Fields are optional at the serde level so that missing values surface as
/// field errors instead of a generic body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
}

/// A `CreatePersonRequest` that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub birth_date: NaiveDate,
    pub admission_date: NaiveDate,
}

/// Body of `PATCH /people/:id`; absent and `null` both mean "leave unchanged".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonRequest {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
}

/// `?output=` selector for the age and salary endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct OutputQuery {
    pub output: Option<String>,
}

impl OutputQuery {
    pub fn require(self) -> Result<String, ApiError> {
        self.output
            .ok_or_else(|| ApiError::InvalidParameter("query parameter 'output' is required".into()))
    }
}

/// Per-field validation messages, keyed by the JSON field name.
#[derive(Debug, Default)]
struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    fn add(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_string()).or_insert_with(|| message.to_string());
    }

    fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    fn into_error(self) -> ApiError {
        ApiError::Validation(self.0)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl CreatePersonRequest {
    /// Check required fields and date constraints relative to `today`.
    pub fn validate(self, today: NaiveDate) -> Result<NewPerson, ApiError> {
        let mut errors = FieldErrors::default();

        let name = match self.name {
            Some(name) if !is_blank(&name) => Some(name),
            _ => {
                errors.add("name", "name is required");
                None
            }
        };
        let birth_date = match self.birth_date {
            Some(date) if date < today => Some(date),
            Some(_) => {
                errors.add("birthDate", "birth date must be in the past");
                None
            }
            None => {
                errors.add("birthDate", "birth date is required");
                None
            }
        };
        let admission_date = match self.admission_date {
            Some(date) if date <= today => Some(date),
            Some(_) => {
                errors.add(
                    "admissionDate",
                    "admission date must be in the past or present",
                );
                None
            }
            None => {
                errors.add("admissionDate", "admission date is required");
                None
            }
        };

        match (name, birth_date, admission_date) {
            (Some(name), Some(birth_date), Some(admission_date)) => Ok(NewPerson {
                name,
                birth_date,
                admission_date,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

impl UpdatePersonRequest {
    /// Check the fields that are present and turn them into a patch.
    pub fn validate(self, today: NaiveDate) -> Result<PersonPatch, ApiError> {
        let mut errors = FieldErrors::default();

        if self.name.as_deref().is_some_and(is_blank) {
            errors.add("name", "name cannot be blank");
        }
        if self.admission_date.is_some_and(|date| date > today) {
            errors.add(
                "admissionDate",
                "admission date must be in the past or present",
            );
        }

        errors.into_result()?;

        Ok(PersonPatch {
            name: self.name.into(),
            birth_date: self.birth_date.into(),
            admission_date: self.admission_date.into(),
        })
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: PersonId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub admission_date: NaiveDate,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id(),
            name: person.name().to_string(),
            birth_date: person.birth_date(),
            admission_date: person.admission_date(),
        }
    }
}
