use std::{fmt, str::FromStr};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::time_window::shift_month;

/// Core record shared by incomes and expenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub has_generated_next: bool,
}

impl Transaction {
    pub fn new(description: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
            recurrence: Recurrence::None,
            has_generated_next: false,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Date of the following occurrence, if this transaction repeats.
    pub fn next_occurrence(&self) -> Option<NaiveDate> {
        self.recurrence.next_date(self.date)
    }

    /// Builds the follow-up occurrence, leaving `self` untouched.
    pub fn next_instance(&self) -> Option<Transaction> {
        let date = self.next_occurrence()?;
        Some(Transaction {
            description: self.description.clone(),
            amount: self.amount,
            date,
            recurrence: self.recurrence,
            has_generated_next: false,
        })
    }
}

/// How often a transaction repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    /// Following occurrence after `from`; `None` for one-off entries and at
    /// the end of the calendar.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => from.checked_add_days(Days::new(1)),
            Recurrence::Weekly => from.checked_add_days(Days::new(7)),
            Recurrence::Monthly => shift_month(from, 1),
        }
    }

    /// Upper-case name used in the persisted records.
    pub fn record_name(&self) -> &'static str {
        match self {
            Recurrence::None => "NONE",
            Recurrence::Daily => "DAILY",
            Recurrence::Weekly => "WEEKLY",
            Recurrence::Monthly => "MONTHLY",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Recurrence::None)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recurrence::None => "-",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
        };
        f.write_str(label)
    }
}

/// Parses a non-negative decimal amount.
///
/// Accepts optional digits, at most one `.`, optional digits, with at least
/// one digit overall. Signs, exponents and embedded spaces are rejected, so
/// `-0` is invalid rather than zero.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut digits = 0;
    let mut dots = 0;
    for ch in raw.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRecurrenceError(pub String);

impl fmt::Display for ParseRecurrenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid recurrence `{}` (use none, daily, weekly or monthly)",
            self.0
        )
    }
}

impl std::error::Error for ParseRecurrenceError {}

impl FromStr for Recurrence {
    type Err = ParseRecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            _ => Err(ParseRecurrenceError(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_recurrence_clamps_to_month_end() {
        assert_eq!(
            Recurrence::Monthly.next_date(date(2024, 1, 31)),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            Recurrence::Monthly.next_date(date(2023, 12, 15)),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn last_representable_date_has_no_next_occurrence() {
        for recurrence in [Recurrence::Daily, Recurrence::Weekly, Recurrence::Monthly] {
            assert_eq!(recurrence.next_date(NaiveDate::MAX), None, "{recurrence:?}");
        }
        assert_eq!(
            Recurrence::Weekly.next_date(date(2024, 2, 26)),
            Some(date(2024, 3, 4))
        );
    }

    #[test]
    fn non_recurring_has_no_next_instance() {
        let txn = Transaction::new("Rent", 900.0, date(2024, 3, 1));
        assert!(txn.next_instance().is_none());
    }

    #[test]
    fn next_instance_copies_fields_and_resets_flag() {
        let mut txn =
            Transaction::new("Gym", 30.0, date(2024, 3, 1)).with_recurrence(Recurrence::Weekly);
        txn.has_generated_next = true;
        let next = txn.next_instance().unwrap();
        assert_eq!(next.date, date(2024, 3, 8));
        assert_eq!(next.description, "Gym");
        assert!(!next.has_generated_next);
    }

    #[test]
    fn amounts_accept_dot_forms_and_reject_signs() {
        assert_eq!(parse_amount(".5"), parse_amount("0.5"));
        assert_eq!(parse_amount("18."), Some(18.0));
        assert_eq!(parse_amount("007.25"), Some(7.25));
        for invalid in ["-0", "-1", "+3", ".", "", "1.2.3", "1e3", "12 3", "abc"] {
            assert_eq!(parse_amount(invalid), None, "{invalid} should be rejected");
        }
    }

    #[test]
    fn recurrence_parses_case_insensitively() {
        assert_eq!("DAILY".parse::<Recurrence>(), Ok(Recurrence::Daily));
        assert_eq!(" monthly ".parse::<Recurrence>(), Ok(Recurrence::Monthly));
        assert!("yearly".parse::<Recurrence>().is_err());
    }
}
