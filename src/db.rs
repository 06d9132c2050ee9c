/*! Opening the application's database and keeping its schema up to date. */

use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, expense::create_expense_table};

/// The version of the database schema this build of the app expects.
///
/// Bump this and extend [initialize] when the schema changes.
pub const SCHEMA_VERSION: i32 = 1;

/// Open the database at `path`, creating the file and tables if they do not exist yet.
///
/// # Errors
/// Returns an error if the file cannot be opened or the schema cannot be created.
pub fn open_or_create(path: impl AsRef<Path>) -> Result<Connection, Error> {
    let path = path.as_ref();

    let connection = Connection::open(path).inspect_err(|error| {
        tracing::error!("could not open the database at {}: {error}", path.display())
    })?;

    initialize(&connection)?;
    tracing::info!("opened the database at {}", path.display());

    Ok(connection)
}

/// Create the tables and indexes for the domain models if the database is
/// older than [SCHEMA_VERSION].
///
/// The schema version is kept in SQLite's `user_version` pragma, so opening a
/// database that is already up to date does nothing.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    let version: i32 = transaction.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < SCHEMA_VERSION {
        tracing::info!("upgrading the database schema from version {version} to {SCHEMA_VERSION}");
        create_expense_table(&transaction)?;
        transaction.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }

    transaction.commit()?;

    Ok(())
}
