use chrono::NaiveDate;

use geocore_core::{DomainError, DomainResult, Entity, PersonId, ValueObject};

use crate::age;

/// A person (employee) record.
///
/// Immutable: every "change" produces a new, re-validated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    name: String,
    birth_date: NaiveDate,
    admission_date: NaiveDate,
}

impl Person {
    /// Build a person, enforcing a non-blank name and `admission_date >= birth_date`.
    pub fn new(
        id: PersonId,
        name: impl Into<String>,
        birth_date: NaiveDate,
        admission_date: NaiveDate,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if admission_date < birth_date {
            return Err(DomainError::validation(
                "admission date cannot be before birth date",
            ));
        }

        Ok(Self {
            id,
            name,
            birth_date,
            admission_date,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn admission_date(&self) -> NaiveDate {
        self.admission_date
    }

    pub fn with_name(&self, name: impl Into<String>) -> DomainResult<Self> {
        Self::new(self.id, name, self.birth_date, self.admission_date)
    }

    pub fn with_birth_date(&self, birth_date: NaiveDate) -> DomainResult<Self> {
        Self::new(self.id, self.name.clone(), birth_date, self.admission_date)
    }

    pub fn with_admission_date(&self, admission_date: NaiveDate) -> DomainResult<Self> {
        Self::new(self.id, self.name.clone(), self.birth_date, admission_date)
    }

    /// Whole calendar years elapsed since admission.
    pub fn years_of_service(&self, today: NaiveDate) -> DomainResult<u32> {
        age::years_of_service(self.admission_date, today)
    }
}

impl Entity for Person {
    type Id = PersonId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A single field in a partial update: either left alone or replaced.
///
/// There is no "clear" state: every person field is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Unchanged,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// The patched value, or `current` when unchanged.
    pub fn resolve(self, current: T) -> T {
        match self {
            Patch::Unchanged => current,
            Patch::Set(value) => value,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Unchanged, Patch::Set)
    }
}

/// Partial update of a [`Person`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonPatch {
    pub name: Patch<String>,
    pub birth_date: Patch<NaiveDate>,
    pub admission_date: Patch<NaiveDate>,
}

impl ValueObject for PersonPatch {}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        !(self.name.is_set() || self.birth_date.is_set() || self.admission_date.is_set())
    }

    /// Merge the set fields onto `current`.
    ///
    /// All fields are merged before validation, so moving both dates in one
    /// patch is judged against the final record only.
    pub fn apply_to(self, current: &Person) -> DomainResult<Person> {
        if self.is_empty() {
            return Ok(current.clone());
        }

        Person::new(
            current.id,
            self.name.resolve(current.name.clone()),
            self.birth_date.resolve(current.birth_date),
            self.admission_date.resolve(current.admission_date),
        )
    }
}
