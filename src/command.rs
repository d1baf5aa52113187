use serde::{Deserialize, Serialize};

use crate::types::DbValue;

/// A SQL statement and its named parameters bundled together.
///
/// Parameters are referenced in the SQL text as `:name`; the binding layer
/// rewrites them into the backend's positional placeholders at execution
/// time. Nothing is validated at construction — empty or malformed text only
/// surfaces when an operator helper runs the command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbCommand {
    /// The SQL text
    pub text: String,
    /// Named parameters bound to `:name` placeholders in the text
    pub params: Vec<(String, DbValue)>,
}

impl DbCommand {
    /// Create a command with no parameters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Create a command with a full parameter bag.
    pub fn with_params(text: impl Into<String>, params: Vec<(String, DbValue)>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    /// Append one named parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: DbValue) -> Self {
        self.params.push((name.into(), value));
        self
    }
}
