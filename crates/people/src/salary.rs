//! Salary projection from years of service.

use core::str::FromStr;

use chrono::NaiveDate;

use geocore_core::{DomainError, DomainResult};

use crate::age;

pub const BASE_SALARY: f64 = 1558.00;
pub const MINIMUM_WAGE: f64 = 1302.00;
pub const ANNUAL_INCREASE_RATE: f64 = 0.18;
pub const ANNUAL_FIXED_INCREASE: f64 = 500.00;

/// How a computed salary is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryOutput {
    /// Currency amount, rounded up to the cent.
    Full,
    /// Multiple of the minimum wage, rounded up to two decimals.
    Min,
}

impl FromStr for SalaryOutput {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(SalaryOutput::Full),
            "min" => Ok(SalaryOutput::Min),
            _ => Err(DomainError::validation(format!(
                "invalid output type: {s}. accepted values: full, min"
            ))),
        }
    }
}

/// Compounding annual-increase salary model.
///
/// Every completed year of service applies
/// `salary = salary * (1 + annual_increase_rate) + annual_fixed_increase`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryCalculator {
    pub base_salary: f64,
    pub minimum_wage: f64,
    pub annual_increase_rate: f64,
    pub annual_fixed_increase: f64,
}

impl Default for SalaryCalculator {
    fn default() -> Self {
        Self {
            base_salary: BASE_SALARY,
            minimum_wage: MINIMUM_WAGE,
            annual_increase_rate: ANNUAL_INCREASE_RATE,
            annual_fixed_increase: ANNUAL_FIXED_INCREASE,
        }
    }
}

impl SalaryCalculator {
    /// Salary of someone admitted on `admission_date`, as seen on `today`.
    pub fn calculate(
        &self,
        admission_date: NaiveDate,
        output: SalaryOutput,
        today: NaiveDate,
    ) -> DomainResult<f64> {
        let years = age::years_of_service(admission_date, today)?;
        let salary = self.salary_after(years);

        let value = match output {
            SalaryOutput::Full => round_up_to_cents(salary),
            SalaryOutput::Min => round_up_to_cents(salary / self.minimum_wage),
        };
        if !value.is_finite() {
            return Err(DomainError::validation(format!(
                "salary after {years} years of service is out of range"
            )));
        }
        Ok(value)
    }

    /// Unrounded salary after `years` completed years.
    pub fn salary_after(&self, years: u32) -> f64 {
        (0..years).fold(self.base_salary, |salary, _| {
            salary * (1.0 + self.annual_increase_rate) + self.annual_fixed_increase
        })
    }
}

/// `ceil(value * 100) / 100`: always toward positive infinity, never to nearest.
pub fn round_up_to_cents(value: f64) -> f64 {
    (value * 100.0).ceil() / 100.0
}
