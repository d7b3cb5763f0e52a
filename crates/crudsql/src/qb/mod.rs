//! Statement builders for the four CRUD verbs.
//!
//! Identifiers, join clauses and conditions are trusted SQL text and are copied verbatim.
//! Values go through [`SqlValue`](crate::SqlValue): rendered inline as literals, or replaced by
//! `$n` placeholders and collected as parameters, depending on [`ValueMode`].
//!
//! # Usage
//!
//! ```
//! use crudsql::qb::{self, SqlQb};
//! use crudsql::ValueMode;
//!
//! let stmt = qb::update("users", &["name", "age"], &["alice", "30"]).condition("id = 1");
//! assert_eq!(stmt.to_sql(), "UPDATE users SET name='alice',age=30 WHERE id = 1");
//!
//! let built = stmt.build(ValueMode::Bind).unwrap();
//! assert_eq!(built.sql, "UPDATE users SET name=$1,age=$2 WHERE id = 1");
//! assert_eq!(built.params.len(), 2);
//! ```

mod delete;
mod insert;
mod param;
mod select;
mod traits;
mod update;

pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use param::ParamList;
pub use select::SelectQb;
pub use traits::{BuiltStatement, SqlQb, ValueMode, Verb};
pub use update::UpdateQb;

use crate::error::{DbError, DbResult};
use crate::literal::{SqlValue, quote};

/// Create a SELECT builder.
pub fn select<S: AsRef<str>>(table: &str, columns: &[S]) -> SelectQb {
    SelectQb::new(table, columns)
}

/// Create an INSERT builder. Columns and values are paired by position.
pub fn insert<C: AsRef<str>, V: AsRef<str>>(table: &str, columns: &[C], values: &[V]) -> InsertQb {
    InsertQb::new(table, columns, values)
}

/// Create an UPDATE builder. Columns and values are paired by position.
pub fn update<C: AsRef<str>, V: AsRef<str>>(table: &str, columns: &[C], values: &[V]) -> UpdateQb {
    UpdateQb::new(table, columns, values)
}

/// Create a DELETE builder.
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

/// How [`join_list`] treats each element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quoting {
    /// Copy elements verbatim (column lists).
    None,
    /// Single-quote every element that does not parse as an integer.
    #[default]
    Values,
}

/// Comma-join a list of strings.
///
/// In [`Quoting::Values`] mode every element that fails integer parsing is quoted, including
/// the string `NULL`; use [`SqlValue`] when `NULL` must stay a keyword.
///
/// ```
/// use crudsql::qb::{join_list, Quoting};
///
/// assert_eq!(join_list(&["id", "name"], Quoting::None), "id,name");
/// assert_eq!(join_list(&["1", "bob"], Quoting::Values), "1,'bob'");
/// ```
pub fn join_list<S: AsRef<str>>(items: &[S], quoting: Quoting) -> String {
    items
        .iter()
        .map(|item| {
            let item = item.as_ref();
            match quoting {
                Quoting::Values if item.parse::<i64>().is_err() => quote(item),
                _ => item.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the `col=value,...` list of an UPDATE with inline literals.
///
/// Values are quoted unless they are integers or the `NULL` keyword.
///
/// ```
/// use crudsql::qb::set_clause;
///
/// let set = set_clause(&["name", "age", "nick"], &["bob", "42", "NULL"]).unwrap();
/// assert_eq!(set, "name='bob',age=42,nick=NULL");
/// ```
pub fn set_clause<C: AsRef<str>, V: AsRef<str>>(columns: &[C], values: &[V]) -> DbResult<String> {
    let values: Vec<SqlValue> = values.iter().map(|v| SqlValue::parse(v.as_ref())).collect();
    let mut params = ParamList::new(ValueMode::Inline);
    render_set(columns, &values, &mut params)
}

pub(crate) fn render_set<C: AsRef<str>>(
    columns: &[C],
    values: &[SqlValue],
    params: &mut ParamList,
) -> DbResult<String> {
    if columns.is_empty() || values.is_empty() {
        return Err(DbError::validation(
            "Columns and values must have at least one entry each",
        ));
    }
    if columns.len() != values.len() {
        return Err(DbError::validation(
            "Columns and values must have the same length",
        ));
    }

    let pairs: Vec<String> = columns
        .iter()
        .zip(values)
        .map(|(column, value)| format!("{}={}", column.as_ref(), params.render(value)))
        .collect();
    Ok(pairs.join(","))
}

pub(crate) fn to_owned_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}
