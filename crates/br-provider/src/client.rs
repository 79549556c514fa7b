//! HTTP client against the provider's guardrail endpoints

use br_listing::{ListingError, ProviderGuardrail, ProviderGuardrails};
use br_provision::{GuardrailProvisioner, ProvisionError};
use br_types::{GuardrailDraft, GuardrailResource, GuardrailStatus, GuardrailVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request timeout for all provider calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the provider's guardrail REST surface
pub struct ProviderClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ProviderClient {
    /// Create a new provider client against the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .user_agent(concat!("botrail/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn guardrails_url(&self) -> String {
        format!("{}/guardrails", self.base_url)
    }

    fn guardrail_url(&self, id: &str) -> String {
        format!("{}/guardrails/{}", self.base_url, urlencoding::encode(id))
    }
}

impl Clone for ProviderClient {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ProviderGuardrails for ProviderClient {
    async fn list_guardrails(
        &self,
        filter_id: Option<&str>,
    ) -> Result<Vec<ProviderGuardrail>, ListingError> {
        let url = match filter_id {
            Some(id) => format!(
                "{}?guardrailIdentifier={}",
                self.guardrails_url(),
                urlencoding::encode(id)
            ),
            None => self.guardrails_url(),
        };

        debug!("Listing guardrails: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ListingError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::Provider(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let listing: ListGuardrailsResponse = response
            .json()
            .await
            .map_err(|e| ListingError::Parse(format!("Failed to parse response: {}", e)))?;

        Ok(listing
            .guardrails
            .into_iter()
            .map(convert_wire_guardrail)
            .collect())
    }
}

#[async_trait::async_trait]
impl GuardrailProvisioner for ProviderClient {
    async fn create_guardrail(
        &self,
        draft: &GuardrailDraft,
    ) -> Result<GuardrailResource, ProvisionError> {
        let url = self.guardrails_url();
        debug!("Creating guardrail '{}': {}", draft.name, url);

        let response = self
            .http_client
            .post(&url)
            .json(&CreateGuardrailRequest {
                name: &draft.name,
                policy: &draft.policy,
            })
            .send()
            .await
            .map_err(|e| ProvisionError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::ResourceCreation(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let created: CreateGuardrailResponse = response
            .json()
            .await
            .map_err(|e| ProvisionError::Parse(format!("Failed to parse response: {}", e)))?;

        Ok(GuardrailResource {
            id: created.guardrail_id,
            name: draft.name.clone(),
            status: GuardrailStatus::from_str_lenient(&created.status),
            policy: draft.policy.clone(),
            created_at: created.created_at.unwrap_or_else(Utc::now),
        })
    }

    async fn create_version(
        &self,
        resource_id: &str,
    ) -> Result<GuardrailVersion, ProvisionError> {
        let url = format!("{}/versions", self.guardrail_url(resource_id));
        debug!("Publishing version of guardrail {}: {}", resource_id, url);

        let response = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| ProvisionError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::VersionCreation {
                resource_id: resource_id.to_string(),
                detail: format!("Provider returned {}: {}", status, body),
            });
        }

        let created: CreateVersionResponse = response
            .json()
            .await
            .map_err(|e| ProvisionError::Parse(format!("Failed to parse response: {}", e)))?;

        Ok(GuardrailVersion {
            version_id: created.version,
            parent_resource_id: created
                .guardrail_id
                .unwrap_or_else(|| resource_id.to_string()),
            created_at: created.created_at.unwrap_or_else(Utc::now),
        })
    }

    async fn delete_version(
        &self,
        resource_id: &str,
        version_id: &str,
    ) -> Result<(), ProvisionError> {
        let url = format!(
            "{}/versions/{}",
            self.guardrail_url(resource_id),
            urlencoding::encode(version_id)
        );
        debug!("Deleting guardrail version: {}", url);
        self.delete(&url, format!("guardrail {} version {}", resource_id, version_id))
            .await
    }

    async fn delete_guardrail(&self, resource_id: &str) -> Result<(), ProvisionError> {
        let url = self.guardrail_url(resource_id);
        debug!("Deleting guardrail: {}", url);
        self.delete(&url, format!("guardrail {}", resource_id)).await
    }
}

impl ProviderClient {
    async fn delete(&self, url: &str, target: String) -> Result<(), ProvisionError> {
        let response = self
            .http_client
            .delete(url)
            .send()
            .await
            .map_err(|e| ProvisionError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::Deletion {
                target,
                detail: format!("Provider returned {}: {}", status, body),
            });
        }

        Ok(())
    }
}

/// Listing response format
#[derive(Debug, Deserialize)]
struct ListGuardrailsResponse {
    #[serde(default)]
    guardrails: Vec<WireGuardrail>,
}

/// One guardrail row on the wire
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGuardrail {
    id: String,

    #[serde(default)]
    name: String,

    #[serde(default)]
    status: String,

    /// Present when listing the versions of a single guardrail
    #[serde(default)]
    version: Option<String>,

    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGuardrailRequest<'a> {
    name: &'a str,
    policy: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGuardrailResponse {
    guardrail_id: String,

    #[serde(default)]
    status: String,

    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateVersionResponse {
    version: String,

    #[serde(default)]
    guardrail_id: Option<String>,

    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Convert a wire row to the listing contract's row
fn convert_wire_guardrail(wire: WireGuardrail) -> ProviderGuardrail {
    ProviderGuardrail {
        id: wire.id,
        name: wire.name,
        status: GuardrailStatus::from_str_lenient(&wire.status),
        version: wire.version,
        created_at: wire.created_at,
    }
}
