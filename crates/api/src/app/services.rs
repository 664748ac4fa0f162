use std::sync::Arc;

use chrono::NaiveDate;

use geocore_core::{Clock, DomainError, DomainResult, Entity, PersonId};
use geocore_infra::{InMemoryPersonStore, PersonStore};
use geocore_people::{AgeOutput, Person, PersonPatch, SalaryCalculator, SalaryOutput};

/// Service type used by the HTTP layer.
pub type AppServices = PersonService<Arc<InMemoryPersonStore>>;

/// Wire the in-memory store and the clock into a service, optionally seeded.
pub fn build_services(clock: Arc<dyn Clock>, seed_sample_data: bool) -> DomainResult<AppServices> {
    let store = Arc::new(InMemoryPersonStore::new());
    let services = PersonService::new(store, clock);

    if seed_sample_data {
        services.seed_sample_people()?;
    }

    Ok(services)
}

/// Person use cases: CRUD plus the derived age and salary values.
///
/// Owns validation and the not-found/conflict semantics; the store only
/// guarantees per-record atomicity.
pub struct PersonService<S> {
    store: S,
    clock: Arc<dyn Clock>,
    salary: SalaryCalculator,
}

impl<S> PersonService<S>
where
    S: PersonStore,
{
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            salary: SalaryCalculator::default(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Pre-populate the three sample people (ids 1–3).
    pub fn seed_sample_people(&self) -> DomainResult<()> {
        let samples = [
            (1u64, "José da Silva", (2000, 4, 6), (2020, 5, 10)),
            (2, "Maria Santos", (1995, 8, 15), (2019, 3, 20)),
            (3, "João Oliveira", (1988, 12, 3), (2021, 1, 15)),
        ];

        for (raw_id, name, birth, admission) in samples {
            let person = Person::new(
                PersonId::try_from(raw_id)?,
                name,
                ymd(birth)?,
                ymd(admission)?,
            )?;
            self.store.save(person);
        }

        tracing::debug!(count = samples.len(), "seeded sample people");
        Ok(())
    }

    pub fn create(
        &self,
        name: String,
        birth_date: NaiveDate,
        admission_date: NaiveDate,
    ) -> DomainResult<Person> {
        let id = self.store.next_id()?;
        let person = self
            .store
            .insert_new(Person::new(id, name, birth_date, admission_date)?)?;

        tracing::info!(person_id = %person.id(), "person created");
        Ok(person)
    }

    pub fn create_with_id(
        &self,
        id: PersonId,
        name: String,
        birth_date: NaiveDate,
        admission_date: NaiveDate,
    ) -> DomainResult<Person> {
        let person = Person::new(id, name, birth_date, admission_date)?;
        let person = self.store.insert_new(person).inspect_err(|_| {
            tracing::debug!(person_id = %id, "create rejected: id already in use");
        })?;

        tracing::info!(person_id = %person.id(), "person created with explicit id");
        Ok(person)
    }

    /// Full replace. Field validation is whatever [`Person::new`] enforces.
    pub fn update(
        &self,
        id: PersonId,
        name: String,
        birth_date: NaiveDate,
        admission_date: NaiveDate,
    ) -> DomainResult<Person> {
        let person = self
            .store
            .update(id, |_current| Person::new(id, name, birth_date, admission_date))?;

        tracing::info!(person_id = %id, "person replaced");
        Ok(person)
    }

    /// Merge the set fields of `patch` onto the stored record.
    pub fn update_partial(&self, id: PersonId, patch: PersonPatch) -> DomainResult<Person> {
        let person = self.store.update(id, |current| patch.apply_to(current))?;

        tracing::info!(person_id = %id, "person patched");
        Ok(person)
    }

    pub fn get(&self, id: PersonId) -> DomainResult<Person> {
        self.store
            .find_by_id(id)
            .ok_or_else(|| DomainError::not_found(format!("person {id}")))
    }

    /// All people, sorted by name.
    pub fn find_all(&self) -> Vec<Person> {
        let mut people = self.store.find_all();
        people.sort_by(|a, b| a.name().cmp(b.name()));
        people
    }

    pub fn delete(&self, id: PersonId) -> DomainResult<()> {
        self.store.delete_by_id(id)?;

        tracing::info!(person_id = %id, "person deleted");
        Ok(())
    }

    /// Age in the unit named by `output` (`days`, `months` or `years`).
    ///
    /// A missing person is reported before an unknown unit.
    pub fn calculate_age(&self, id: PersonId, output: &str) -> DomainResult<i64> {
        let person = self.get(id)?;
        let output: AgeOutput = output.parse()?;
        output.measure(person.birth_date(), self.today())
    }

    /// Salary expressed as named by `output` (`full` or `min`).
    pub fn calculate_salary(&self, id: PersonId, output: &str) -> DomainResult<f64> {
        let person = self.get(id)?;
        let output: SalaryOutput = output.parse()?;
        self.salary
            .calculate(person.admission_date(), output, self.today())
    }
}

fn ymd((year, month, day): (i32, u32, u32)) -> DomainResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DomainError::validation(format!("invalid date {year}-{month}-{day}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocore_core::FixedClock;
    use geocore_people::Patch;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn id(raw: u64) -> PersonId {
        PersonId::try_from(raw).unwrap()
    }

    fn service_on(today: NaiveDate) -> AppServices {
        build_services(Arc::new(FixedClock(today)), true).unwrap()
    }

    fn empty_service_on(today: NaiveDate) -> AppServices {
        build_services(Arc::new(FixedClock(today)), false).unwrap()
    }

    #[test]
    fn seed_populates_three_people() {
        let svc = service_on(date(2023, 2, 1));
        let names: Vec<_> = svc.find_all().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["José da Silva", "João Oliveira", "Maria Santos"]);
    }

    #[test]
    fn create_assigns_next_id() {
        let svc = service_on(date(2023, 2, 1));
        let p = svc
            .create("Ana".into(), date(1990, 1, 1), date(2010, 1, 1))
            .unwrap();
        assert_eq!(p.id().get(), 4);

        let empty = empty_service_on(date(2023, 2, 1));
        let first = empty
            .create("Ana".into(), date(1990, 1, 1), date(2010, 1, 1))
            .unwrap();
        assert_eq!(first.id(), PersonId::FIRST);
    }

    #[test]
    fn create_rejects_admission_before_birth() {
        let svc = empty_service_on(date(2023, 2, 1));
        let err = svc
            .create("Ana".into(), date(2010, 1, 1), date(2009, 1, 1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(svc.find_all().is_empty());
    }

    #[test]
    fn create_with_existing_id_conflicts() {
        let svc = service_on(date(2023, 2, 1));
        let err = svc
            .create_with_id(id(2), "Dup".into(), date(1990, 1, 1), date(2010, 1, 1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(svc.get(id(2)).unwrap().name(), "Maria Santos");

        let created = svc
            .create_with_id(id(10), "Dez".into(), date(1990, 1, 1), date(2010, 1, 1))
            .unwrap();
        assert_eq!(created.id().get(), 10);
    }

    #[test]
    fn create_after_the_top_id_never_overwrites() {
        let svc = empty_service_on(date(2023, 2, 1));
        svc.create_with_id(id(u64::MAX), "Original".into(), date(1990, 1, 1), date(2010, 1, 1))
            .unwrap();

        let err = svc
            .create("Intruder".into(), date(1990, 1, 1), date(2010, 1, 1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(svc.get(id(u64::MAX)).unwrap().name(), "Original");
        assert_eq!(svc.find_all().len(), 1);
    }

    #[test]
    fn update_replaces_every_field() {
        let svc = service_on(date(2023, 2, 1));
        let p = svc
            .update(id(1), "Novo".into(), date(1980, 1, 1), date(2000, 1, 1))
            .unwrap();
        assert_eq!(p.name(), "Novo");
        assert_eq!(svc.get(id(1)).unwrap().birth_date(), date(1980, 1, 1));
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let svc = service_on(date(2023, 2, 1));
        let err = svc
            .update(id(99), "X".into(), date(1980, 1, 1), date(2000, 1, 1))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn partial_update_preserves_unspecified_fields() {
        let svc = service_on(date(2023, 2, 1));
        let before = svc.get(id(1)).unwrap();

        let after = svc
            .update_partial(
                id(1),
                PersonPatch {
                    name: Patch::Set("José Souza".into()),
                    ..PersonPatch::default()
                },
            )
            .unwrap();

        assert_eq!(after.name(), "José Souza");
        assert_eq!(after.birth_date(), before.birth_date());
        assert_eq!(after.admission_date(), before.admission_date());
    }

    #[test]
    fn partial_update_missing_id_is_not_found() {
        let svc = empty_service_on(date(2023, 2, 1));
        let err = svc.update_partial(id(1), PersonPatch::default()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn find_all_sorts_by_name_regardless_of_insertion_order() {
        let svc = empty_service_on(date(2023, 2, 1));
        for name in ["Carla", "Ana", "Bruno"] {
            svc.create(name.into(), date(1990, 1, 1), date(2010, 1, 1))
                .unwrap();
        }

        let names: Vec<_> = svc.find_all().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["Ana", "Bruno", "Carla"]);
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let svc = service_on(date(2023, 2, 1));
        svc.delete(id(3)).unwrap();
        assert!(matches!(svc.get(id(3)), Err(DomainError::NotFound(_))));
        assert!(matches!(svc.delete(id(3)), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn age_in_each_unit() {
        let svc = service_on(date(2023, 2, 1));
        assert_eq!(svc.calculate_age(id(1), "years").unwrap(), 22);
        assert_eq!(svc.calculate_age(id(1), "months").unwrap(), 273);
        assert_eq!(svc.calculate_age(id(1), "days").unwrap(), 8336);
    }

    #[test]
    fn age_of_missing_person_is_not_found() {
        let svc = service_on(date(2023, 2, 1));
        let err = svc.calculate_age(id(42), "years").unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn unknown_output_kinds_are_invalid_input() {
        let svc = service_on(date(2023, 2, 1));
        assert!(matches!(svc.calculate_age(id(1), "weeks"), Err(DomainError::Validation(_))));
        assert!(matches!(svc.calculate_salary(id(1), "bogus"), Err(DomainError::Validation(_))));
        // Lookup happens first.
        assert!(matches!(svc.calculate_salary(id(77), "bogus"), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn salary_uses_the_service_clock() {
        let svc = empty_service_on(date(2023, 2, 1));
        svc.create_with_id(id(5), "Novo".into(), date(1990, 1, 1), date(2023, 2, 1))
            .unwrap();
        svc.create_with_id(id(6), "Veterano".into(), date(1990, 1, 1), date(2022, 2, 1))
            .unwrap();

        assert_eq!(svc.calculate_salary(id(5), "full").unwrap(), 1558.00);
        assert_eq!(svc.calculate_salary(id(6), "full").unwrap(), 2338.44);
        assert_eq!(svc.calculate_salary(id(6), "min").unwrap(), 1.80);
    }
}
