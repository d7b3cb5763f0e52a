//! # crudsql
//!
//! Validated CRUD access to PostgreSQL from plain string arguments.
//!
//! ## Features
//!
//! - **Four operations**: `select`, `insert`, `update` and `delete` on [`CrudDb`]
//! - **Shape checks first**: empty tables, empty columns and mismatched column/value lists are
//!   rejected before a connection is opened
//! - **Safe defaults**: UPDATE and DELETE require a condition
//! - **Bound values**: values are sent as parameters by default; [`ValueMode::Inline`] renders
//!   literals instead
//! - **Untyped rows**: results decode into ordered [`Record`]s of [`Value`]s
//! - **Injected logging**: every operation reports through a [`Logger`] (`tracing` by default)
//!
//! ## Example
//!
//! ```ignore
//! use crudsql::{ConnectionDescriptor, CrudDb};
//!
//! let db = CrudDb::new(ConnectionDescriptor::from_env()?);
//!
//! db.insert("users", &["name", "age"], &["alice", "30"], false).await?;
//!
//! let adults = db
//!     .select("users", &["id", "name"], None, Some("age >= 18"), false)
//!     .await?;
//! for row in &adults {
//!     println!("{:?}", row.get("name"));
//! }
//!
//! db.delete("users", Some("name = 'alice'"), false).await?;
//! ```
//!
//! ## Statement builders
//!
//! The [`qb`] module builds the statements without running them:
//!
//! ```
//! use crudsql::qb::{self, SqlQb};
//!
//! let sql = qb::select("users", &["id", "name"]).condition("age > 18").to_sql();
//! assert_eq!(sql, "SELECT id,name FROM users WHERE age > 18");
//! ```

pub mod client;
pub mod connection;
pub mod db;
pub mod error;
pub mod literal;
pub mod logger;
pub mod qb;
pub mod row;
pub mod validate;
pub mod value;

#[cfg(test)]
mod testing;

pub use client::Executor;
pub use connection::{
    ConnectionDescriptor, ConnectionFactory, Connector, DEFAULT_PORT, PgConnection, PgConnector,
};
pub use db::{CrudDb, DbOptions};
pub use error::{DbError, DbResult};
pub use literal::{NULL_KEYWORD, SqlValue, serialize_value};
pub use logger::{LogEntry, LogLevel, Logger, MemoryLogger, TracingLogger};
pub use qb::{BuiltStatement, Quoting, SqlQb, ValueMode, Verb, join_list, set_clause};
pub use row::{RawRow, RawValue, decode_rows};
pub use value::{Record, Value};
