//! # SkillHub Models
//!
//! Wire types for the skills backend. The backend owns these entities; this
//! layer only decodes them and hands them to the view layer untouched.
//!
//! Fields the backend emits but this crate does not know about are kept in
//! `extra`, so a summary or detail re-serializes to what the backend sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single catalog entry as returned by the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SkillSummary {
    /// Unique, URL-safe key used for routing and detail lookups
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Path relative to the backend's data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Pass-through fields not modelled here
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SkillSummary {
    /// Create a summary with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Full skill content for the detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SkillDetail {
    #[serde(flatten)]
    pub summary: SkillSummary,
    /// Raw SKILL.md content
    #[serde(default)]
    pub readme: String,
    /// Indented listing of the skill's files, one `- entry` per line
    #[serde(default)]
    pub file_tree: String,
}

impl SkillDetail {
    pub fn name(&self) -> &str {
        &self.summary.name
    }
}

/// Envelope of `GET /skills`
///
/// The backend encodes an empty result as `null`, which decodes to an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkillList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills: Vec<SkillSummary>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SkillSummary>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<SkillSummary>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body the backend sends alongside 4xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
