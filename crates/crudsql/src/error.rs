//! Error types for crudsql

use thiserror::Error;

/// Result type alias for crudsql operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Opening the connection or the liveness check failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Caller-supplied arguments have an invalid shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// The database rejected or failed to execute the statement
    #[error("Query error: {message}")]
    Query {
        /// SQLSTATE code reported by the server, if any
        code: Option<String>,
        message: String,
    },

    /// Column metadata retrieval or row scanning failed
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl DbError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a query error without a SQLSTATE code
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            code: None,
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// SQLSTATE code of a query error
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Self::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Check if the server reported an integrity constraint violation (SQLSTATE class 23)
    pub fn is_constraint_violation(&self) -> bool {
        self.sqlstate().is_some_and(|code| code.starts_with("23"))
    }

    /// Convert a tokio_postgres error raised while executing a statement
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let message = match db_err.constraint() {
                Some(constraint) => format!("{}: {}", constraint, db_err.message()),
                None => db_err.message().to_string(),
            };
            return Self::Query {
                code: Some(db_err.code().code().to_string()),
                message,
            };
        }
        Self::query(err.to_string())
    }
}
