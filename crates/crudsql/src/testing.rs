//! In-memory connector used by unit tests.

use crate::client::Executor;
use crate::connection::{ConnectionDescriptor, Connector};
use crate::error::{DbError, DbResult};
use crate::literal::SqlValue;
use crate::logger::Logger;
use crate::row::{RawRow, RawValue};
use crate::value::Value;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub(crate) struct FakeRow {
    pub columns: Vec<String>,
    pub cells: Vec<RawValue>,
    /// Column whose scan fails
    pub fail_scan: Option<String>,
}

impl FakeRow {
    pub fn new(cells: &[(&str, Value)]) -> Self {
        Self {
            columns: cells.iter().map(|(c, _)| c.to_string()).collect(),
            cells: cells.iter().map(|(_, v)| RawValue::Scalar(v.clone())).collect(),
            fail_scan: None,
        }
    }

    pub fn failing_scan(mut self, column: &str) -> Self {
        self.fail_scan = Some(column.to_string());
        self
    }
}

impl RawRow for FakeRow {
    fn column_names(&self) -> DbResult<Vec<String>> {
        Ok(self.columns.clone())
    }

    fn scan(&self) -> DbResult<Vec<RawValue>> {
        match &self.fail_scan {
            Some(column) => Err(DbError::decode(column.as_str(), "cannot scan value")),
            None => Ok(self.cells.clone()),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub fail_open: bool,
    pub fail_ping: bool,
    /// Error message returned for every statement
    pub fail_statement: Option<String>,
    pub rows: Vec<FakeRow>,
    pub affected: u64,

    pub opened: usize,
    pub closed: usize,
    pub dropped: usize,
    pub statements: Vec<(String, Vec<SqlValue>)>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn with_rows(self, rows: Vec<FakeRow>) -> Self {
        self.state().rows = rows;
        self
    }

    pub fn with_affected(self, affected: u64) -> Self {
        self.state().affected = affected;
        self
    }

    pub fn failing_open(self) -> Self {
        self.state().fail_open = true;
        self
    }

    pub fn failing_ping(self) -> Self {
        self.state().fail_ping = true;
        self
    }

    pub fn failing_statements(self, message: &str) -> Self {
        self.state().fail_statement = Some(message.to_string());
        self
    }

    pub fn statements(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.state().statements.clone()
    }
}

impl Connector for FakeConnector {
    type Conn = FakeConnection;

    async fn open(
        &self,
        _descriptor: &ConnectionDescriptor,
        _logger: &Arc<dyn Logger>,
    ) -> DbResult<FakeConnection> {
        let mut state = self.state();
        if state.fail_open {
            return Err(DbError::connection("connection refused"));
        }
        state.opened += 1;
        Ok(FakeConnection {
            state: Arc::clone(&self.state),
        })
    }
}

pub(crate) struct FakeConnection {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnection {
    fn record(&self, sql: &str, params: &[SqlValue]) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.statements.push((sql.to_string(), params.to_vec()));
        match &state.fail_statement {
            Some(message) => Err(DbError::Query {
                code: Some("42P01".to_string()),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Executor for FakeConnection {
    type Row = FakeRow;

    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<FakeRow>> {
        self.record(sql, params)?;
        Ok(self.state.lock().unwrap().rows.clone())
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<u64> {
        self.record(sql, params)?;
        Ok(self.state.lock().unwrap().affected)
    }

    async fn ping(&self) -> DbResult<()> {
        if self.state.lock().unwrap().fail_ping {
            return Err(DbError::query("server closed the connection unexpectedly"));
        }
        Ok(())
    }

    async fn close(self) {
        self.state.lock().unwrap().closed += 1;
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.dropped += 1;
        }
    }
}
