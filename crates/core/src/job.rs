use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A normalized job posting, as persisted and served by `GET /jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalJob {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub apply_link: String,
    pub salary: String,
}

/// Which mandatory-field check the ingestion filter applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Check `id`, title and company on the raw record, before any defaulting.
    #[default]
    Strict,
    /// Check the normalized record. Title and company already carry defaults,
    /// so only a missing `id` drops a record.
    Lenient,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!(
                "unknown validation policy '{}': expected 'strict' or 'lenient'",
                other
            )),
        }
    }
}
