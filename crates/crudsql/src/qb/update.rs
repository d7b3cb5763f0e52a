//! UPDATE statement builder.

use crate::error::DbResult;
use crate::literal::SqlValue;
use crate::qb::param::ParamList;
use crate::qb::render_set;
use crate::qb::to_owned_list;
use crate::qb::traits::{BuiltStatement, SqlQb, ValueMode, Verb};
use crate::validate;

/// `UPDATE <table> SET <col=val,...> [WHERE <condition>]`
///
/// [`SqlQb::validate`] requires a condition; [`SqlQb::build`] renders without one.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    table: String,
    columns: Vec<String>,
    values: Vec<SqlValue>,
    condition: Option<String>,
}

impl UpdateQb {
    pub fn new<C: AsRef<str>, V: AsRef<str>>(table: &str, columns: &[C], values: &[V]) -> Self {
        Self {
            table: table.to_string(),
            columns: to_owned_list(columns),
            values: values.iter().map(|v| SqlValue::parse(v.as_ref())).collect(),
            condition: None,
        }
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

impl SqlQb for UpdateQb {
    fn verb(&self) -> Verb {
        Verb::Update
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn validate(&self) -> DbResult<()> {
        validate::check_table(&self.table)?;
        validate::check_columns(&self.columns)?;
        validate::check_values(&self.columns, &self.values)?;
        validate::require_condition("update", self.condition.as_deref())
    }

    fn build(&self, mode: ValueMode) -> DbResult<BuiltStatement> {
        let mut params = ParamList::new(mode);
        let set = render_set(&self.columns, &self.values, &mut params)?;

        let mut sql = format!("UPDATE {} SET {}", self.table, set);
        if let Some(condition) = &self.condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }

        Ok(BuiltStatement {
            verb: Verb::Update,
            sql,
            params: params.into_params(),
        })
    }
}
