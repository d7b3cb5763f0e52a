//! INSERT statement builder.

use crate::error::{DbError, DbResult};
use crate::literal::SqlValue;
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltStatement, SqlQb, ValueMode, Verb};
use crate::qb::{Quoting, join_list, to_owned_list};
use crate::validate;

/// `INSERT INTO <table> (<cols>) VALUES (<vals>)`
#[derive(Clone, Debug)]
pub struct InsertQb {
    table: String,
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl InsertQb {
    pub fn new<C: AsRef<str>, V: AsRef<str>>(table: &str, columns: &[C], values: &[V]) -> Self {
        Self {
            table: table.to_string(),
            columns: to_owned_list(columns),
            values: values.iter().map(|v| SqlValue::parse(v.as_ref())).collect(),
        }
    }
}

impl SqlQb for InsertQb {
    fn verb(&self) -> Verb {
        Verb::Insert
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn validate(&self) -> DbResult<()> {
        validate::check_table(&self.table)?;
        validate::check_columns(&self.columns)?;
        validate::check_values(&self.columns, &self.values)
    }

    fn build(&self, mode: ValueMode) -> DbResult<BuiltStatement> {
        let columns = join_list(&self.columns, Quoting::None);
        if columns.is_empty() {
            return Err(DbError::validation(
                "Impossible to transform the columns into a list",
            ));
        }
        if self.values.is_empty() {
            return Err(DbError::validation(
                "Impossible to transform the values into a list",
            ));
        }

        let mut params = ParamList::new(mode);
        let values = params.render_list(&self.values);
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table, columns, values
        );

        Ok(BuiltStatement {
            verb: Verb::Insert,
            sql,
            params: params.into_params(),
        })
    }
}
