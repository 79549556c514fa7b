//! The provisioning collaborator contract

use br_types::{GuardrailDraft, GuardrailResource, GuardrailVersion, RailError};
use thiserror::Error;

/// Provisioning error types
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),

    #[error("Version creation failed for guardrail {resource_id}: {detail}")]
    VersionCreation { resource_id: String, detail: String },

    #[error(
        "Version {version_id} references guardrail {actual_parent}, expected {expected_parent}"
    )]
    OrphanVersion {
        version_id: String,
        expected_parent: String,
        actual_parent: String,
    },

    #[error("Deletion failed for {target}: {detail}")]
    Deletion { target: String, detail: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ProvisionError> for RailError {
    fn from(err: ProvisionError) -> Self {
        RailError::Provision(err.to_string())
    }
}

/// Owns the cloud lifecycle of guardrail resources and versions.
///
/// Implementations must treat each call as a single completed operation: when
/// `create_guardrail` returns `Ok`, the resource exists and may be referenced
/// by a subsequent `create_version`.
#[async_trait::async_trait]
pub trait GuardrailProvisioner: Send + Sync {
    /// Create the guardrail resource from a draft definition
    async fn create_guardrail(
        &self,
        draft: &GuardrailDraft,
    ) -> Result<GuardrailResource, ProvisionError>;

    /// Publish an immutable version of an existing guardrail
    async fn create_version(&self, resource_id: &str)
        -> Result<GuardrailVersion, ProvisionError>;

    /// Delete a published version
    async fn delete_version(
        &self,
        resource_id: &str,
        version_id: &str,
    ) -> Result<(), ProvisionError>;

    /// Delete the guardrail resource itself
    async fn delete_guardrail(&self, resource_id: &str) -> Result<(), ProvisionError>;
}
