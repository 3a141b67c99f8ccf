//! Lead domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder name used when no name-like key is present in the payload.
pub const DEFAULT_LEAD_NAME: &str = "Desconhecido";

/// Key injected into `raw_data` to mark which environment received the lead.
pub const ENVIRONMENT_KEY: &str = "_environment";

/// Marker distinguishing test-mode submissions from production submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Test,
    Production,
}

impl Environment {
    /// Maps a webhook path segment onto an environment tag. Only the exact
    /// segment `test` selects the test environment; anything else is
    /// production.
    pub fn from_segment(segment: &str) -> Self {
        if segment == "test" {
            Environment::Test
        } else {
            Environment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical persisted lead, as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    /// Store-assigned identifier, unique and immutable once assigned.
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especialidades: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idx: Option<Value>,
    /// Original decoded payload plus the injected `_environment` tag.
    pub raw_data: Value,
    /// Store-assigned at insert time, sole ordering key.
    pub created_at: DateTime<Utc>,
}

/// Input model for inserting a lead; `id` and `created_at` are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewLead {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub instagram: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especialidades: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idx: Option<Value>,
    pub raw_data: Value,
}

impl Lead {
    /// Whether the lead qualifies for the dashboard's "has website" filter.
    pub fn has_website(&self) -> bool {
        !self.website.trim().is_empty()
    }
}
