//! Statement execution on an open connection.

use crate::error::DbResult;
use crate::literal::SqlValue;
use crate::row::RawRow;
use std::future::Future;

/// An open connection that can run built statements.
///
/// Parameters arrive as [`SqlValue`]s; each implementation decides how to bind them. SQL text
/// built with [`ValueMode::Inline`](crate::ValueMode::Inline) has no placeholders and an empty
/// parameter slice.
pub trait Executor: Send + Sync {
    /// Row type produced by [`Executor::query`].
    type Row: RawRow + Send;

    /// Execute a statement and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = DbResult<Vec<Self::Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> impl Future<Output = DbResult<u64>> + Send;

    /// Liveness check.
    fn ping(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Close the connection, returning once the server has been told.
    fn close(self) -> impl Future<Output = ()> + Send
    where
        Self: Sized;
}
