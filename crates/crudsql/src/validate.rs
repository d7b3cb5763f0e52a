//! Shape checks on caller arguments, run before any SQL is built or any connection is opened.
//!
//! Every check returns a [`DbError::Validation`] naming the specific problem.

use crate::error::{DbError, DbResult};

/// The condition value older callers pass to mean "no condition".
///
/// It is not interpreted: a `"-1"` condition is appended after `WHERE` like any other.
pub const NO_CONDITION_SENTINEL: &str = "-1";

pub fn check_table(table: &str) -> DbResult<()> {
    if table.trim().is_empty() {
        return Err(DbError::validation("Need a table name"));
    }
    Ok(())
}

pub fn check_columns<S: AsRef<str>>(columns: &[S]) -> DbResult<()> {
    if columns.is_empty() {
        return Err(DbError::validation("Need at least one column"));
    }
    Ok(())
}

/// Columns and values are paired by position.
pub fn check_values<C, V>(columns: &[C], values: &[V]) -> DbResult<()> {
    if values.is_empty() {
        return Err(DbError::validation("Need at least one value"));
    }
    if columns.len() != values.len() {
        return Err(DbError::validation(format!(
            "Columns and values must have the same length (got {} columns and {} values)",
            columns.len(),
            values.len()
        )));
    }
    Ok(())
}

pub fn check_condition(condition: Option<&str>) -> DbResult<()> {
    if let Some(condition) = condition {
        if condition.trim().is_empty() {
            return Err(DbError::validation("Condition must not be empty"));
        }
    }
    Ok(())
}

/// A join clause is only built together with a condition.
pub fn check_join(join: Option<&str>, condition: Option<&str>) -> DbResult<()> {
    let Some(join) = join else {
        return Ok(());
    };
    if join.trim().is_empty() {
        return Err(DbError::validation("Join clause must not be empty"));
    }
    if condition.is_none() {
        return Err(DbError::validation("A join clause requires a condition"));
    }
    Ok(())
}

/// UPDATE and DELETE refuse to run without a condition.
pub fn require_condition(verb: &str, condition: Option<&str>) -> DbResult<()> {
    match condition {
        Some(_) => check_condition(condition),
        None => Err(DbError::validation(format!(
            "Enter a condition to {verb} rows from the table"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_must_be_named() {
        assert!(check_table("users").is_ok());
        assert!(check_table("").unwrap_err().is_validation());
        assert!(check_table("   ").is_err());
    }

    #[test]
    fn columns_must_be_present() {
        assert!(check_columns(&["id"]).is_ok());
        assert!(check_columns::<&str>(&[]).is_err());
    }

    #[test]
    fn values_must_pair_with_columns() {
        assert!(check_values(&["a", "b"], &["1", "2"]).is_ok());
        assert!(check_values(&["a"], &[] as &[&str]).is_err());

        let err = check_values(&["a", "b"], &["1"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Columns and values must have the same length (got 2 columns and 1 values)"
        );
    }

    #[test]
    fn condition_must_not_be_blank() {
        assert!(check_condition(None).is_ok());
        assert!(check_condition(Some("id = 1")).is_ok());
        assert!(check_condition(Some(" ")).is_err());
    }

    #[test]
    fn join_needs_condition() {
        assert!(check_join(None, None).is_ok());
        assert!(check_join(Some("JOIN t ON t.id = u.t_id"), Some("u.id = 1")).is_ok());
        assert!(check_join(Some("JOIN t ON t.id = u.t_id"), None).is_err());
        assert!(check_join(Some(""), Some("u.id = 1")).is_err());
    }

    #[test]
    fn mutations_need_condition() {
        assert!(require_condition("delete", None).is_err());
        assert!(require_condition("delete", Some(NO_CONDITION_SENTINEL)).is_ok());
        assert!(require_condition("update", Some("")).is_err());
    }
}
