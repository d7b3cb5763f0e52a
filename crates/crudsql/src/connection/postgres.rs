use super::{ConnectionDescriptor, Connector};
use crate::client::Executor;
use crate::error::{DbError, DbResult};
use crate::literal::SqlValue;
use crate::logger::Logger;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Row};

/// Plain-TCP PostgreSQL connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

impl Connector for PgConnector {
    type Conn = PgConnection;

    async fn open(
        &self,
        descriptor: &ConnectionDescriptor,
        logger: &Arc<dyn Logger>,
    ) -> DbResult<PgConnection> {
        let (client, connection) = descriptor
            .to_pg_config()
            .connect(NoTls)
            .await
            .map_err(|e| DbError::connection(e.to_string()))?;

        let logger = Arc::clone(logger);
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                logger.error("Connection closed with error", Some(&e));
            }
        });

        Ok(PgConnection { client, driver })
    }
}

/// A single `tokio-postgres` connection.
///
/// Owns the task driving the socket. [`Executor::close`] waits for that task to send
/// `Terminate` and finish; a connection that is only dropped finishes in the background.
pub struct PgConnection {
    client: Client,
    driver: JoinHandle<()>,
}

impl PgConnection {
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn param_refs(params: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

impl Executor for PgConnection {
    type Row = Row;

    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let params = param_refs(params);
        self.client
            .query(sql, &params)
            .await
            .map_err(DbError::from_db_error)
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<u64> {
        let params = param_refs(params);
        self.client
            .execute(sql, &params)
            .await
            .map_err(DbError::from_db_error)
    }

    async fn ping(&self) -> DbResult<()> {
        self.client
            .simple_query("SELECT 1")
            .await
            .map(|_| ())
            .map_err(|e| DbError::connection(e.to_string()))
    }

    async fn close(self) {
        let PgConnection { client, driver } = self;
        drop(client);
        let _ = driver.await;
    }
}
