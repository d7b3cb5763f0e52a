//! SELECT statement builder.

use crate::error::{DbError, DbResult};
use crate::qb::traits::{BuiltStatement, SqlQb, ValueMode, Verb};
use crate::qb::{Quoting, join_list, to_owned_list};
use crate::validate;

/// `SELECT <cols> FROM <table> [<join>] [WHERE <condition>]`
#[derive(Clone, Debug)]
pub struct SelectQb {
    table: String,
    columns: Vec<String>,
    /// Raw JOIN text, placed between the table and WHERE
    join: Option<String>,
    /// Raw condition text, placed after WHERE
    condition: Option<String>,
}

impl SelectQb {
    pub fn new<S: AsRef<str>>(table: &str, columns: &[S]) -> Self {
        Self {
            table: table.to_string(),
            columns: to_owned_list(columns),
            join: None,
            condition: None,
        }
    }

    /// Set a raw join clause, e.g. `INNER JOIN orders o ON o.user_id = u.id`.
    pub fn join(mut self, join: &str) -> Self {
        self.join = Some(join.to_string());
        self
    }

    /// Set an optional join clause.
    pub fn join_opt(mut self, join: Option<&str>) -> Self {
        self.join = join.map(str::to_string);
        self
    }

    /// Set the raw condition appended after `WHERE`.
    pub fn condition(mut self, condition: &str) -> Self {
        self.condition = Some(condition.to_string());
        self
    }

    /// Set an optional condition.
    pub fn condition_opt(mut self, condition: Option<&str>) -> Self {
        self.condition = condition.map(str::to_string);
        self
    }
}

impl SqlQb for SelectQb {
    fn verb(&self) -> Verb {
        Verb::Select
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn validate(&self) -> DbResult<()> {
        validate::check_table(&self.table)?;
        validate::check_columns(&self.columns)?;
        validate::check_condition(self.condition.as_deref())?;
        validate::check_join(self.join.as_deref(), self.condition.as_deref())
    }

    // Values never appear in a SELECT, so the mode has no effect.
    fn build(&self, _mode: ValueMode) -> DbResult<BuiltStatement> {
        let columns = join_list(&self.columns, Quoting::None);
        if columns.is_empty() {
            return Err(DbError::validation(
                "Impossible to transform the columns into a list",
            ));
        }

        let sql = match (&self.join, &self.condition) {
            (None, None) => format!("SELECT {} FROM {}", columns, self.table),
            (None, Some(condition)) => {
                format!("SELECT {} FROM {} WHERE {}", columns, self.table, condition)
            }
            (Some(join), Some(condition)) => format!(
                "SELECT {} FROM {} {} WHERE {}",
                columns, self.table, join, condition
            ),
            (Some(_), None) => {
                return Err(DbError::validation("A join clause requires a condition"));
            }
        };

        Ok(BuiltStatement {
            verb: Verb::Select,
            sql,
            params: Vec::new(),
        })
    }
}
