//! DELETE statement builder.

use crate::error::DbResult;
use crate::qb::traits::{BuiltStatement, SqlQb, ValueMode, Verb};
use crate::validate;

/// `DELETE FROM <table> [WHERE <condition>]`
///
/// [`SqlQb::validate`] requires a condition; [`SqlQb::build`] renders without one.
#[derive(Clone, Debug)]
pub struct DeleteQb {
    table: String,
    condition: Option<String>,
}

impl DeleteQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
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

impl SqlQb for DeleteQb {
    fn verb(&self) -> Verb {
        Verb::Delete
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn validate(&self) -> DbResult<()> {
        validate::check_table(&self.table)?;
        validate::require_condition("delete", self.condition.as_deref())
    }

    fn build(&self, _mode: ValueMode) -> DbResult<BuiltStatement> {
        let sql = match &self.condition {
            Some(condition) => format!("DELETE FROM {} WHERE {}", self.table, condition),
            None => format!("DELETE FROM {}", self.table),
        };
        Ok(BuiltStatement {
            verb: Verb::Delete,
            sql,
            params: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_with_condition() {
        let qb = DeleteQb::new("users").condition("id = 3");
        assert_eq!(qb.to_sql(), "DELETE FROM users WHERE id = 3");
        assert!(qb.validate().is_ok());
    }

    #[test]
    fn test_delete_without_condition() {
        let qb = DeleteQb::new("users");
        assert_eq!(qb.to_sql(), "DELETE FROM users");
        assert!(qb.validate().is_err());
    }

    #[test]
    fn test_delete_needs_table() {
        assert!(DeleteQb::new("").condition("id = 1").validate().is_err());
    }
}
