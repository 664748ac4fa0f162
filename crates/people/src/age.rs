//! Calendar age arithmetic.
//!
//! Differences are civil periods (years, then months, then days), not totals
//! divided by an average month length. A month "wraps" using the actual number
//! of days in the months traversed.

use core::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

use geocore_core::{DomainError, DomainResult, ValueObject};

/// Decomposed calendar age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl ValueObject for Age {}

impl Age {
    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }
}

/// Civil-period difference between `birth_date` and `today`.
///
/// Fails when `birth_date` is after `today`.
pub fn diff(birth_date: NaiveDate, today: NaiveDate) -> DomainResult<Age> {
    ensure_not_after(birth_date, today, "birth date")?;
    Ok(period_between(birth_date, today))
}

/// Whole calendar years between `admission_date` and `today`.
pub fn years_of_service(admission_date: NaiveDate, today: NaiveDate) -> DomainResult<u32> {
    ensure_not_after(admission_date, today, "admission date")?;
    Ok(period_between(admission_date, today).years)
}

/// Total whole days lived.
pub fn total_days(birth_date: NaiveDate, today: NaiveDate) -> DomainResult<i64> {
    ensure_not_after(birth_date, today, "birth date")?;
    Ok((today - birth_date).num_days())
}

/// Total whole months lived (truncating; a month only counts once its day-of-month is reached).
pub fn total_months(birth_date: NaiveDate, today: NaiveDate) -> DomainResult<i64> {
    diff(birth_date, today).map(|age| i64::from(age.total_months()))
}

fn ensure_not_after(date: NaiveDate, today: NaiveDate, what: &str) -> DomainResult<()> {
    if date > today {
        return Err(DomainError::validation(format!(
            "{what} cannot be in the future"
        )));
    }
    Ok(())
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

// Requires `start <= end`.
fn period_between(start: NaiveDate, end: NaiveDate) -> Age {
    let mut total_months = month_index(end) - month_index(start);
    if total_months > 0 && end.day() < start.day() {
        total_months -= 1;
    }
    let total_months = u32::try_from(total_months).unwrap_or(0);

    let days = start
        .checked_add_months(Months::new(total_months))
        .map_or(0, |anchor| (end - anchor).num_days());

    Age {
        years: total_months / 12,
        months: total_months % 12,
        days: u32::try_from(days).unwrap_or(0),
    }
}

/// Unit selector for the age endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeOutput {
    Days,
    Months,
    Years,
}

impl AgeOutput {
    /// Age of someone born on `birth_date`, in this unit.
    pub fn measure(self, birth_date: NaiveDate, today: NaiveDate) -> DomainResult<i64> {
        match self {
            AgeOutput::Days => total_days(birth_date, today),
            AgeOutput::Months => total_months(birth_date, today),
            AgeOutput::Years => diff(birth_date, today).map(|age| i64::from(age.years)),
        }
    }
}

impl FromStr for AgeOutput {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "days" => Ok(AgeOutput::Days),
            "months" => Ok(AgeOutput::Months),
            "years" => Ok(AgeOutput::Years),
            _ => Err(DomainError::validation(format!(
                "invalid output type: {s}. accepted values: days, months, years"
            ))),
        }
    }
}
