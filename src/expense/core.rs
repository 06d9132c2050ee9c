//! Defines the core data models for expenses.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;

use crate::Error;

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// A validated, non-empty expense name, e.g. "Coffee".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ExpenseName(String);

impl ExpenseName {
    /// Create an expense name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyExpenseName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyExpenseName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create an expense name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ExpenseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ExpenseName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseName::new(s)
    }
}

impl Display for ExpenseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount of money with exactly two decimal places.
///
/// Amounts are kept as decimals rather than floats so that monthly totals add
/// up to the cent. They are stored in the database as text, e.g. "3.50".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places every amount is rounded to.
    pub const DECIMAL_PLACES: u32 = 2;

    /// No money at all. Used as the total of an empty month.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// The largest amount a single expense may have, 999,999,999,999.99.
    pub const MAX: Amount = Amount(Decimal::from_parts(
        276_447_231,
        23_283,
        0,
        false,
        Self::DECIMAL_PLACES,
    ));

    /// Create an amount for an expense, rounding half away from zero to two decimal places.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAmount] if the rounded amount is not greater
    /// than zero or is more than [Amount::MAX].
    pub fn new(value: Decimal) -> Result<Self, Error> {
        let rounded = round_to_cents(value);

        if rounded <= Decimal::ZERO || rounded > Self::MAX.0 {
            Err(Error::InvalidAmount(value.to_string()))
        } else {
            Ok(Self(rounded))
        }
    }

    /// The amount as a decimal number.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Add two amounts, returning `None` if the result is too large to represent.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0
            .checked_add(rhs.0)
            .map(|sum| Amount(round_to_cents(sum)))
    }
}

fn round_to_cents(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(Amount::DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(Amount::DECIMAL_PLACES);
    rounded
}

impl FromStr for Amount {
    type Err = Error;

    /// Parse an amount entered by the user, e.g. "3.5", "20.25" or "1e3".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let value = Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|_| Error::InvalidAmount(text.to_owned()))?;

        Amount::new(value).map_err(|_| Error::InvalidAmount(text.to_owned()))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Decimal::from_str(text)
            .map(|value| Amount(round_to_cents(value)))
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Money spent on something.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub name: ExpenseName,
    /// How much was spent.
    pub amount: Amount,
    /// When the expense was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [NewExpense] for discoverability.
    pub fn build(name: ExpenseName, amount: Amount, date: OffsetDateTime) -> NewExpense {
        NewExpense { name, amount, date }
    }
}

/// An expense that has not been saved to the database yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// What the money was spent on.
    pub name: ExpenseName,
    /// How much was spent.
    pub amount: Amount,
    /// When the expense was recorded.
    ///
    /// The database stores whole seconds, so any sub-second part is dropped.
    pub date: OffsetDateTime,
}
