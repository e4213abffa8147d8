//! Classification of pool and Diesel failures shared by every repository.
//!
//! Repositories turn a [`DbFailure`] into their own port error, so the
//! connection-versus-query split is decided in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::models::CorruptRow;
use super::pool::PoolError;

/// Storage failure, reduced to what repositories need to decide on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The database could not be reached.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key pointed at a missing row.
    ForeignKeyViolation { constraint: Option<String> },
    /// Anything else.
    Query(String),
}

impl DbFailure {
    /// Map into a port error with separate connection and query constructors.
    ///
    /// Constraint violations fall back to the query constructor; callers that
    /// care about them match on the failure first.
    pub(crate) fn into_port_error<E>(
        self,
        connection: impl FnOnce(String) -> E,
        query: impl FnOnce(String) -> E,
    ) -> E {
        match self {
            Self::Connection(message) => connection(message),
            Self::UniqueViolation { constraint } => {
                query(format!("unique constraint violated: {}", constraint.unwrap_or_default()))
            }
            Self::ForeignKeyViolation { constraint } => query(format!(
                "foreign key constraint violated: {}",
                constraint.unwrap_or_default()
            )),
            Self::Query(message) => query(message),
        }
    }
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            other => debug!(error = %other, "diesel operation failed"),
        }
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection closed".to_owned())
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}

impl From<CorruptRow> for DbFailure {
    fn from(error: CorruptRow) -> Self {
        Self::Query(error.to_string())
    }
}
