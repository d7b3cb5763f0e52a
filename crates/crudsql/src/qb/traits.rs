//! Trait definitions for statement builders.

use crate::error::DbResult;
use crate::literal::SqlValue;
use serde::Deserialize;
use std::fmt;

/// The four supported statement kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Select,
    Insert,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Select => "SELECT",
            Verb::Insert => "INSERT",
            Verb::Update => "UPDATE",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How values are placed into the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueMode {
    /// `$1, $2, ...` placeholders, values sent as parameters.
    #[default]
    Bind,
    /// Values rendered as SQL literals in the text. Text is quoted without escaping.
    Inline,
}

/// SQL text plus the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltStatement {
    pub verb: Verb,
    pub sql: String,
    /// Empty when built with [`ValueMode::Inline`].
    pub params: Vec<SqlValue>,
}

impl BuiltStatement {
    /// SQL text with the parameters listed after it, for logs.
    pub fn describe(&self) -> String {
        if self.params.is_empty() {
            return self.sql.clone();
        }
        let params: Vec<String> = self.params.iter().map(SqlValue::to_literal).collect();
        format!("{} -- params: [{}]", self.sql, params.join(", "))
    }
}

/// Base trait for all statement builders.
pub trait SqlQb {
    fn verb(&self) -> Verb;

    /// Table the statement targets.
    fn table(&self) -> &str;

    /// Check the caller-supplied shape without building anything.
    fn validate(&self) -> DbResult<()>;

    /// Render the statement.
    fn build(&self, mode: ValueMode) -> DbResult<BuiltStatement>;

    /// Debug helper: the statement with inline literals.
    ///
    /// Returns an empty string when the statement cannot be built.
    fn to_sql(&self) -> String {
        self.build(ValueMode::Inline)
            .map(|built| built.sql)
            .unwrap_or_default()
    }
}
