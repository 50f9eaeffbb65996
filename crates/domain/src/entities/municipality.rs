//! Municipality entity

use serde::{Deserialize, Serialize};

/// A city or county served individually through the national provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Municipality {
    /// Display name as reported by the provider (e.g., "청주시")
    pub name: String,
    /// Provider city code (e.g., "33010")
    pub code: String,
}

impl Municipality {
    /// Create a new municipality
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Returns true if the code belongs to the county group with the given prefix
    #[must_use]
    pub fn has_code_prefix(&self, prefix: &str) -> bool {
        self.code.starts_with(prefix)
    }
}
