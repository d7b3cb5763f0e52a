//! Value placement while a statement is rendered.

use crate::literal::SqlValue;
use crate::qb::traits::ValueMode;

/// Collects bound values and hands out their placeholders.
///
/// In [`ValueMode::Inline`] nothing is collected and each value renders as its literal.
#[derive(Clone, Debug)]
pub struct ParamList {
    mode: ValueMode,
    params: Vec<SqlValue>,
}

impl ParamList {
    pub fn new(mode: ValueMode) -> Self {
        Self {
            mode,
            params: Vec::new(),
        }
    }

    /// Render one value: `$n` (1-based) when binding, the literal otherwise.
    pub fn render(&mut self, value: &SqlValue) -> String {
        match self.mode {
            ValueMode::Inline => value.to_literal(),
            ValueMode::Bind => {
                self.params.push(value.clone());
                format!("${}", self.params.len())
            }
        }
    }

    /// Render values comma-joined.
    pub fn render_list(&mut self, values: &[SqlValue]) -> String {
        values
            .iter()
            .map(|v| self.render(v))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn into_params(self) -> Vec<SqlValue> {
        self.params
    }
}
