use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};

use geocore_core::{DomainError, DomainResult, Entity, PersonId};
use geocore_people::Person;

/// Key/value store of person records.
pub trait PersonStore: Send + Sync {
    /// Insert or overwrite the record under `person.id()`.
    fn save(&self, person: Person) -> Person;

    /// Insert only if `person.id()` is free; fails with `Conflict` otherwise.
    ///
    /// The check and the insert happen under one shard lock.
    fn insert_new(&self, person: Person) -> DomainResult<Person>;

    fn find_by_id(&self, id: PersonId) -> Option<Person>;

    /// Atomic read-modify-write of one record.
    ///
    /// `updater` runs while the record is locked against other writers, so it
    /// must not call back into the store. If it fails, the stored record is
    /// left as it was.
    fn update<F>(&self, id: PersonId, updater: F) -> DomainResult<Person>
    where
        F: FnOnce(&Person) -> DomainResult<Person>;

    /// Snapshot of all records, in no particular order.
    fn find_all(&self) -> Vec<Person>;

    fn delete_by_id(&self, id: PersonId) -> DomainResult<()>;

    fn exists_by_id(&self, id: PersonId) -> bool;

    /// `1 + max(existing ids)`, or `1` when empty.
    ///
    /// Not a reservation: two concurrent callers can observe the same value.
    /// Fails with `Conflict` once an id at `u64::MAX` is stored.
    fn next_id(&self) -> DomainResult<PersonId>;
}

impl<S> PersonStore for Arc<S>
where
    S: PersonStore,
{
    fn save(&self, person: Person) -> Person {
        (**self).save(person)
    }

    fn insert_new(&self, person: Person) -> DomainResult<Person> {
        (**self).insert_new(person)
    }

    fn find_by_id(&self, id: PersonId) -> Option<Person> {
        (**self).find_by_id(id)
    }

    fn update<F>(&self, id: PersonId, updater: F) -> DomainResult<Person>
    where
        F: FnOnce(&Person) -> DomainResult<Person>,
    {
        (**self).update(id, updater)
    }

    fn find_all(&self) -> Vec<Person> {
        (**self).find_all()
    }

    fn delete_by_id(&self, id: PersonId) -> DomainResult<()> {
        (**self).delete_by_id(id)
    }

    fn exists_by_id(&self, id: PersonId) -> bool {
        (**self).exists_by_id(id)
    }

    fn next_id(&self) -> DomainResult<PersonId> {
        (**self).next_id()
    }
}

/// In-memory store backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryPersonStore {
    inner: DashMap<PersonId, Person>,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn not_found(id: PersonId) -> DomainError {
    DomainError::not_found(format!("person {id}"))
}

impl PersonStore for InMemoryPersonStore {
    fn save(&self, person: Person) -> Person {
        self.inner.insert(person.id(), person.clone());
        person
    }

    fn insert_new(&self, person: Person) -> DomainResult<Person> {
        match self.inner.entry(person.id()) {
            Entry::Occupied(_) => Err(DomainError::conflict(format!(
                "person with id {} already exists",
                person.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(person.clone());
                Ok(person)
            }
        }
    }

    fn find_by_id(&self, id: PersonId) -> Option<Person> {
        self.inner.get(&id).map(|entry| entry.value().clone())
    }

    fn update<F>(&self, id: PersonId, updater: F) -> DomainResult<Person>
    where
        F: FnOnce(&Person) -> DomainResult<Person>,
    {
        // The shard write guard is held until the replacement is stored.
        let mut entry = self.inner.get_mut(&id).ok_or_else(|| not_found(id))?;

        let next = updater(entry.value())?;
        if next.id() != id {
            return Err(DomainError::invariant(format!(
                "update of person {id} produced person {}",
                next.id()
            )));
        }

        *entry.value_mut() = next.clone();
        Ok(next)
    }

    fn find_all(&self) -> Vec<Person> {
        self.inner.iter().map(|entry| entry.value().clone()).collect()
    }

    fn delete_by_id(&self, id: PersonId) -> DomainResult<()> {
        self.inner
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    fn exists_by_id(&self, id: PersonId) -> bool {
        self.inner.contains_key(&id)
    }

    fn next_id(&self) -> DomainResult<PersonId> {
        match self.inner.iter().map(|entry| *entry.key()).max() {
            None => Ok(PersonId::FIRST),
            Some(max) => max
                .next()
                .ok_or_else(|| DomainError::conflict("person ids exhausted")),
        }
    }
}
