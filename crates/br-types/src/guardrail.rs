//! Guardrail domain types shared across the workspace

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version id the provider assigns to the mutable working copy of a guardrail
pub const DRAFT_VERSION: &str = "DRAFT";

/// Provisioning status of a guardrail resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardrailStatus {
    Creating,
    Ready,
    Versioning,
    Failed,
    Deleting,
}

impl std::fmt::Display for GuardrailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Creating => write!(f, "CREATING"),
            Self::Ready => write!(f, "READY"),
            Self::Versioning => write!(f, "VERSIONING"),
            Self::Failed => write!(f, "FAILED"),
            Self::Deleting => write!(f, "DELETING"),
        }
    }
}

impl GuardrailStatus {
    /// Parse status from a provider string (case-insensitive).
    /// Unknown strings map to `Creating` so they are never treated as usable.
    pub fn from_str_lenient(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "READY" => Self::Ready,
            "VERSIONING" => Self::Versioning,
            "FAILED" => Self::Failed,
            "DELETING" => Self::Deleting,
            _ => Self::Creating,
        }
    }

    /// Whether the resource can be offered for selection or versioned
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Input to provisioning: the logical guardrail definition.
/// The policy payload is opaque to BotRail; its schema belongs to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailDraft {
    pub name: String,
    pub policy: serde_json::Value,
}

/// A provisioned guardrail resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailResource {
    /// Provider-assigned id, unknown until creation completes
    pub id: String,
    pub name: String,
    pub status: GuardrailStatus,
    /// The policy payload the resource was created from, opaque to BotRail
    pub policy: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// An immutable, numbered snapshot of a guardrail's policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailVersion {
    pub version_id: String,
    /// Id of the GuardrailResource this version snapshots
    pub parent_resource_id: String,
    pub created_at: DateTime<Utc>,
}

/// Client-visible projection of a guardrail and its published versions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailSummary {
    pub id: String,
    pub name: String,
    /// Version ids, newest first. Non-empty for entries that reach clients.
    #[serde(default)]
    pub versions: Vec<String>,
    /// At most one entry per listing carries this flag
    #[serde(default)]
    pub default: bool,
}

/// Listing payload handed to selection clients.
/// The wire form may omit `guardrails` entirely; that reads as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardrailListOutput {
    #[serde(default)]
    pub guardrails: Vec<GuardrailSummary>,
}

/// The (resource, version) pair currently in effect for a bot.
/// Meaningless unless `resource_id` is non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    pub resource_id: String,
    pub version_id: String,
}

impl SelectionState {
    pub fn new(resource_id: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            version_id: version_id.into(),
        }
    }

    /// An empty resource id means no selection has been made
    pub fn is_unset(&self) -> bool {
        self.resource_id.is_empty()
    }
}

/// A value/label pair for the presentation layer's dropdowns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}
