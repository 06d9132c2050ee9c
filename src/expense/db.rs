//! Database operations for expenses.

use std::ops::Range;

use rusqlite::{Connection, Row, Transaction, TransactionBehavior, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Amount, Expense, ExpenseId, ExpenseName, NewExpense},
};

/// Create the expense table and its lookup indexes.
///
/// Dates are stored as UTC unix timestamps (whole seconds) so that range
/// queries on `idx_expense_date` compare numbers, not strings.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            amount TEXT NOT NULL,
            date INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_name ON expense(name);
        CREATE INDEX IF NOT EXISTS idx_expense_amount ON expense(amount);
        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )?;

    Ok(())
}

/// Save an expense in a write transaction and return it with its generated ID.
///
/// # Errors
/// Returns an [Error::SqlError] if the expense could not be saved.
pub fn insert_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let expense = transaction
        .prepare(
            "INSERT INTO expense (name, amount, date) VALUES (?1, ?2, ?3)
             RETURNING id, name, amount, date",
        )?
        .query_row(
            (
                expense.name.as_ref(),
                expense.amount,
                expense.date.unix_timestamp(),
            ),
            map_expense_row,
        )?;

    transaction.commit()?;

    Ok(expense)
}

/// Retrieve the expenses dated within `instants`, oldest entry first.
///
/// The range is half-open: expenses dated exactly at `instants.end` are excluded.
pub fn get_expenses_in_range(
    instants: Range<OffsetDateTime>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, date FROM expense
             WHERE date >= ?1 AND date < ?2
             ORDER BY id ASC",
        )?
        .query_map(
            (
                instants.start.unix_timestamp(),
                instants.end.unix_timestamp(),
            ),
            map_expense_row,
        )?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Add up the amounts of the expenses dated within `instants`.
///
/// Amounts are summed as decimals in Rust rather than with SQL `SUM`, which
/// would convert the stored text to floating point.
///
/// # Errors
/// Returns [Error::TotalOverflow] if the total is too large to represent.
pub fn sum_amounts_in_range(
    instants: Range<OffsetDateTime>,
    connection: &Connection,
) -> Result<Amount, Error> {
    connection
        .prepare("SELECT amount FROM expense WHERE date >= ?1 AND date < ?2")?
        .query_map(
            (
                instants.start.unix_timestamp(),
                instants.end.unix_timestamp(),
            ),
            |row| row.get::<_, Amount>(0),
        )?
        .try_fold(Amount::ZERO, |total, maybe_amount| {
            total
                .checked_add(maybe_amount?)
                .ok_or(Error::TotalOverflow)
        })
}

/// Delete an expense by ID in a write transaction.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if there is no expense with the ID `id`.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let rows_affected = transaction.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    transaction.commit()?;

    Ok(())
}

/// Map a row of `id, name, amount, date` to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let amount = row.get(2)?;
    let timestamp: i64 = row.get(3)?;
    let date = OffsetDateTime::from_unix_timestamp(timestamp).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(error))
    })?;

    Ok(Expense {
        id,
        name: ExpenseName::new_unchecked(&raw_name),
        amount,
        date,
    })
}
