//! Common Diesel-to-port error translation.
//!
//! Each repository port carries its own error enum, but the Diesel
//! failure classes are the same everywhere: checkout problems become
//! connection errors, query failures become query errors. Raw driver
//! messages are logged at debug level; the port errors hold stable
//! operator-facing strings instead.

use tracing::debug;

use super::pool::PoolError;

/// Translate a pool failure through a port's connection-error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Translate a Diesel failure through a port's error constructors.
///
/// Only a closed connection counts as a connection error; everything
/// else, `NotFound` included, is reported as a query error and left to
/// the repository to interpret.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(
            error_type = %std::any::type_name_of_val(other),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}
