use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the schema a table lives in.
///
/// Databases without a schema concept (or whose schemas were all filtered
/// out) collect their tables under a single `Unqualified` bucket. It sorts
/// before every named schema and renders as an empty string in listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum SchemaRef {
    #[default]
    Unqualified,
    Named(String),
}

impl SchemaRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// `None` and blank input both mean "no schema".
    pub fn from_input(input: Option<&str>) -> Self {
        match input {
            Some(name) if !name.trim().is_empty() => Self::Named(name.to_string()),
            _ => Self::Unqualified,
        }
    }

    /// Form handed to a driver: `None` asks for unqualified lookups.
    pub fn as_option(&self) -> Option<&str> {
        match self {
            Self::Unqualified => None,
            Self::Named(name) => Some(name),
        }
    }

    pub fn as_str(&self) -> &str {
        self.as_option().unwrap_or("")
    }

    pub fn is_unqualified(&self) -> bool {
        matches!(self, Self::Unqualified)
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
