//! The [`CrudDb`] facade: one connection and one statement per call.

use crate::client::Executor;
use crate::connection::{ConnectionDescriptor, ConnectionFactory, Connector, PgConnector};
use crate::error::{DbError, DbResult};
use crate::logger::{Logger, TracingLogger};
use crate::qb::{self, BuiltStatement, SqlQb, ValueMode};
use crate::row::decode_rows;
use crate::validate::NO_CONDITION_SENTINEL;
use crate::value::Record;
use std::sync::Arc;

/// Settings shared by every operation of a [`CrudDb`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DbOptions {
    value_mode: ValueMode,
    debug: bool,
}

impl DbOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// How values are placed into statements (default: bound parameters).
    pub fn value_mode(mut self, mode: ValueMode) -> Self {
        self.value_mode = mode;
        self
    }

    /// Log the executed SQL for every call, whatever the per-call flag says.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn mode(&self) -> ValueMode {
        self.value_mode
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }
}

/// Validated CRUD access to a single database.
///
/// Each operation validates its arguments, builds one statement, opens a fresh connection,
/// runs the statement and closes the connection before returning. Nothing is cached between
/// calls, so a `CrudDb` can be shared freely.
///
/// ```ignore
/// let db = CrudDb::new(ConnectionDescriptor::from_env()?);
///
/// db.insert("users", &["name", "age"], &["alice", "30"], false).await?;
/// let rows = db.select("users", &["id", "name"], None, Some("age > 18"), false).await?;
/// db.update("users", &["age"], &["31"], Some("name = 'alice'"), true).await?;
/// db.delete("users", Some("name = 'alice'"), false).await?;
/// ```
pub struct CrudDb<C: Connector = PgConnector> {
    factory: ConnectionFactory<C>,
    logger: Arc<dyn Logger>,
    options: DbOptions,
}

impl CrudDb<PgConnector> {
    /// PostgreSQL access logging through `tracing`.
    pub fn new(descriptor: ConnectionDescriptor) -> Self {
        Self::with_logger(descriptor, Arc::new(TracingLogger::new()))
    }

    pub fn with_logger(descriptor: ConnectionDescriptor, logger: Arc<dyn Logger>) -> Self {
        Self::with_connector(descriptor, PgConnector, logger)
    }
}

impl<C: Connector> CrudDb<C> {
    pub fn with_connector(
        descriptor: ConnectionDescriptor,
        connector: C,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            factory: ConnectionFactory::new(Arc::new(descriptor), connector, logger.clone()),
            logger,
            options: DbOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DbOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> DbOptions {
        self.options
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        self.factory.descriptor()
    }

    /// Read rows.
    ///
    /// Without a join or condition the statement is exactly `SELECT <cols> FROM <table>`.
    /// A join requires a condition.
    pub async fn select<S: AsRef<str> + Sync>(
        &self,
        table: &str,
        columns: &[S],
        join: Option<&str>,
        condition: Option<&str>,
        debug: bool,
    ) -> DbResult<Vec<Record>> {
        let qb = qb::select(table, columns)
            .join_opt(join)
            .condition_opt(condition);
        let stmt = self.prepare(&qb)?;

        let conn = self.factory.connect().await?;
        let rows = conn.query(&stmt.sql, &stmt.params).await;
        conn.close().await;
        let rows = rows.inspect_err(|err| self.log_failure(&stmt, err))?;
        let records = decode_rows(&rows).inspect_err(|err| {
            self.logger
                .error("Impossible to read the result of the query", Some(err));
        })?;

        self.trace(&stmt, debug);
        Ok(records)
    }

    /// Insert one row. Returns the number of inserted rows.
    pub async fn insert<Col, Val>(
        &self,
        table: &str,
        columns: &[Col],
        values: &[Val],
        debug: bool,
    ) -> DbResult<u64>
    where
        Col: AsRef<str> + Sync,
        Val: AsRef<str> + Sync,
    {
        let stmt = self.prepare(&qb::insert(table, columns, values))?;
        self.run(&stmt, debug).await
    }

    /// Update the rows matching `condition`. A condition is required.
    pub async fn update<Col, Val>(
        &self,
        table: &str,
        columns: &[Col],
        values: &[Val],
        condition: Option<&str>,
        debug: bool,
    ) -> DbResult<u64>
    where
        Col: AsRef<str> + Sync,
        Val: AsRef<str> + Sync,
    {
        let qb = qb::update(table, columns, values).condition_opt(condition);
        let stmt = self.prepare(&qb)?;
        self.warn_sentinel(condition);
        self.run(&stmt, debug).await
    }

    /// Delete the rows matching `condition`. A condition is required.
    pub async fn delete(&self, table: &str, condition: Option<&str>, debug: bool) -> DbResult<u64> {
        let qb = qb::delete(table).condition_opt(condition);
        let stmt = self.prepare(&qb)?;
        self.warn_sentinel(condition);

        let affected = self.run(&stmt, debug).await?;
        self.logger
            .info(&format!("Deleting successful from {table}"));
        Ok(affected)
    }

    /// Open, ping and close a connection.
    pub async fn ping(&self) -> DbResult<()> {
        let conn = self.factory.connect().await?;
        conn.close().await;
        Ok(())
    }

    fn prepare<Q: SqlQb>(&self, qb: &Q) -> DbResult<BuiltStatement> {
        qb.validate()
            .and_then(|()| qb.build(self.options.value_mode))
            .inspect_err(|err| {
                self.logger.error(
                    &format!(
                        "Invalid {} on table '{}'",
                        qb.verb(),
                        qb.table()
                    ),
                    Some(err),
                );
            })
    }

    async fn run(&self, stmt: &BuiltStatement, debug: bool) -> DbResult<u64> {
        let conn = self.factory.connect().await?;
        let affected = conn.execute(&stmt.sql, &stmt.params).await;
        conn.close().await;
        let affected = affected.inspect_err(|err| self.log_failure(stmt, err))?;

        self.trace(stmt, debug);
        Ok(affected)
    }

    fn log_failure(&self, stmt: &BuiltStatement, err: &DbError) {
        self.logger
            .error(&format!("{} failed", stmt.verb), Some(err));
        self.logger.debug(&stmt.describe());
    }

    fn trace(&self, stmt: &BuiltStatement, debug: bool) {
        if debug || self.options.debug {
            self.logger.debug(&stmt.describe());
        }
    }

    fn warn_sentinel(&self, condition: Option<&str>) {
        if condition.map(str::trim) == Some(NO_CONDITION_SENTINEL) {
            self.logger.warn(
                "Condition \"-1\" has no special meaning and is sent to the database as written",
            );
        }
    }
}
