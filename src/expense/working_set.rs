//! Snapshots of the current month's expenses and their total.

use std::fmt::Display;

use rusqlite::Connection;
use time_tz::Tz;

use crate::{
    Error,
    expense::{
        Amount, CalendarMonth, Expense,
        db::{get_expenses_in_range, sum_amounts_in_range},
    },
    html::format_currency,
};

/// The expenses recorded in one calendar month, oldest entry first.
///
/// A working set is a snapshot: it is rebuilt from the database after every
/// change and never updated in place. The database is the source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingSet {
    month: CalendarMonth,
    expenses: Vec<Expense>,
}

impl WorkingSet {
    /// Read the expenses dated within `month`.
    pub fn fetch(month: CalendarMonth, connection: &Connection) -> Result<Self, Error> {
        let expenses = get_expenses_in_range(month.instants(), connection)?;

        Ok(Self { month, expenses })
    }

    /// Read the expenses for the calendar month it is right now in `timezone`.
    pub fn fetch_current_month(
        timezone: &'static Tz,
        connection: &Connection,
    ) -> Result<Self, Error> {
        Self::fetch(CalendarMonth::current(timezone), connection)
    }

    #[cfg(test)]
    pub(crate) fn from_expenses(month: CalendarMonth, expenses: Vec<Expense>) -> Self {
        Self { month, expenses }
    }

    /// The month this snapshot covers.
    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    /// The expenses in this snapshot, oldest entry first.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// The number of expenses in the snapshot.
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Whether no expenses were recorded in the month.
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

/// The sum of the amounts spent in a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// The month the total covers.
    pub month: CalendarMonth,
    /// The amount spent in `month`.
    pub total: Amount,
}

impl MonthlyTotal {
    /// Add up the expenses dated within `month`.
    ///
    /// Only the rows in `month` are read, using the index on the expense date.
    pub fn compute(month: CalendarMonth, connection: &Connection) -> Result<Self, Error> {
        let total = sum_amounts_in_range(month.instants(), connection)?;

        Ok(Self { month, total })
    }

    /// Add up the expenses for the calendar month it is right now in `timezone`.
    pub fn compute_current_month(
        timezone: &'static Tz,
        connection: &Connection,
    ) -> Result<Self, Error> {
        Self::compute(CalendarMonth::current(timezone), connection)
    }
}

impl Display for MonthlyTotal {
    /// Formats the total as "<MonthName>: ₹<total>", e.g. "October: ₹30.25".
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.month.month(), format_currency(&self.total))
    }
}
