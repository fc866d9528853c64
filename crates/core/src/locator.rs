use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque element query understood by the session backend.
///
/// The query language (XPath, CSS, role selectors) is owned by the
/// [`crate::Session`] implementation; this crate never interprets the string,
/// it only passes it through and reports it in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(query: &str) -> Self {
        Self(query.to_string())
    }
}

impl From<String> for Locator {
    fn from(query: String) -> Self {
        Self(query)
    }
}
