//! People domain module (employee records and their derived values).
//!
//! This crate contains business rules for people, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Every calculation
//! takes `today` explicitly.

pub mod age;
pub mod person;
pub mod salary;

pub use age::{Age, AgeOutput};
pub use person::{Patch, Person, PersonPatch};
pub use salary::{SalaryCalculator, SalaryOutput};
