//! Per-operation connections.
//!
//! Every public operation opens one connection through a [`Connector`], pings it, uses it and
//! closes it. [`ConnectionFactory`] adds the ping and the logging around that.

mod descriptor;
mod postgres;

pub use descriptor::{ConnectionDescriptor, DEFAULT_PORT};
pub use postgres::{PgConnection, PgConnector};

use crate::client::Executor;
use crate::error::{DbError, DbResult};
use crate::logger::Logger;
use std::future::Future;
use std::sync::Arc;

/// Opens connections described by a [`ConnectionDescriptor`].
pub trait Connector: Send + Sync {
    type Conn: Executor;

    /// Open a connection. Errors that end an established connection go to `logger`.
    fn open(
        &self,
        descriptor: &ConnectionDescriptor,
        logger: &Arc<dyn Logger>,
    ) -> impl Future<Output = DbResult<Self::Conn>> + Send;
}

/// Opens and verifies one connection per call.
pub struct ConnectionFactory<C: Connector = PgConnector> {
    descriptor: Arc<ConnectionDescriptor>,
    connector: C,
    logger: Arc<dyn Logger>,
}

impl<C: Connector> ConnectionFactory<C> {
    pub fn new(descriptor: Arc<ConnectionDescriptor>, connector: C, logger: Arc<dyn Logger>) -> Self {
        Self {
            descriptor,
            connector,
            logger,
        }
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Open a connection and ping it.
    ///
    /// Both failures surface as [`DbError::Connection`]; the connection opened before a failed
    /// ping is closed before returning.
    pub async fn connect(&self) -> DbResult<C::Conn> {
        let conn = match self.connector.open(&self.descriptor, &self.logger).await {
            Ok(conn) => conn,
            Err(err) => {
                let err = into_connection_error(err);
                self.logger.error(
                    &format!(
                        "Something went wrong when connecting to {}",
                        self.descriptor.redacted_dsn()
                    ),
                    Some(&err),
                );
                return Err(err);
            }
        };

        if let Err(err) = conn.ping().await {
            let err = into_connection_error(err);
            self.logger
                .error("Impossible to ping the database", Some(&err));
            conn.close().await;
            return Err(err);
        }

        self.logger.info("Connection successful");
        Ok(conn)
    }
}

fn into_connection_error(err: DbError) -> DbError {
    match err {
        DbError::Connection(_) => err,
        other => DbError::connection(other.to_string()),
    }
}
