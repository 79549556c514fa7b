//! Low-level provider listing contract

use br_types::{GuardrailResource, GuardrailStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::ListingError;

/// One row of the provider's guardrail listing.
///
/// Listing without a filter yields one row per guardrail; listing with a
/// guardrail id yields one row per version of that guardrail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderGuardrail {
    pub id: String,
    pub name: String,
    pub status: GuardrailStatus,
    /// Present when listing the versions of a single guardrail
    pub version: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProviderGuardrail {
    /// Rebuild a resource handle from this listing row.
    /// The policy payload is not available through the listing; it stays `Null`.
    pub fn into_resource_handle(self) -> GuardrailResource {
        GuardrailResource {
            id: self.id,
            name: self.name,
            status: self.status,
            policy: serde_json::Value::Null,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// The provider's raw listing call
#[async_trait::async_trait]
pub trait ProviderGuardrails: Send + Sync {
    /// List all guardrails, or all versions of one guardrail when
    /// `filter_id` is given
    async fn list_guardrails(
        &self,
        filter_id: Option<&str>,
    ) -> Result<Vec<ProviderGuardrail>, ListingError>;
}
