//! Resource-Version Binder: the ordered two-step provisioning sequence

use std::sync::Arc;

use br_types::{GuardrailDraft, GuardrailResource};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::binding::GuardrailBinding;
use crate::provisioner::{GuardrailProvisioner, ProvisionError};

/// Why a bind attempt failed, and what survived it
#[derive(Debug, Error)]
pub enum BindFailure {
    /// The resource step failed. Nothing was created; the version step was
    /// never attempted.
    #[error("guardrail creation aborted: {source}")]
    Resource {
        #[source]
        source: ProvisionError,
    },

    /// The version step failed after the resource was created. The resource
    /// is retained (not rolled back); retry with [`Binder::bind_version`].
    #[error("version step failed for guardrail {}: {source}", .resource.id)]
    Version {
        resource: GuardrailResource,
        #[source]
        source: ProvisionError,
    },
}

/// Creates a guardrail resource and publishes a version bound to it.
///
/// The two creation calls are never parallelized: the version call is gated on
/// the resource call having completed, which is what makes the returned
/// binding's dependency edge truthful.
pub struct Binder {
    provisioner: Arc<dyn GuardrailProvisioner>,
}

impl Binder {
    pub fn new(provisioner: Arc<dyn GuardrailProvisioner>) -> Self {
        Self { provisioner }
    }

    /// Provision a (resource, version) pair from a draft definition.
    ///
    /// Resource first, version second. A resource failure aborts before the
    /// version step is attempted, so no orphan version can exist. A version
    /// failure reports the surviving resource for a targeted retry.
    pub async fn bind(&self, draft: &GuardrailDraft) -> Result<GuardrailBinding, BindFailure> {
        info!("Provisioning guardrail '{}'", draft.name);

        let resource = self
            .provisioner
            .create_guardrail(draft)
            .await
            .map_err(|source| BindFailure::Resource { source })?;
        debug!("Created guardrail resource {}", resource.id);

        self.bind_version(&resource).await
    }

    /// Publish a version against an already-created resource.
    ///
    /// This is the retry path after [`BindFailure::Version`]: the resource
    /// step is not repeated.
    pub async fn bind_version(
        &self,
        resource: &GuardrailResource,
    ) -> Result<GuardrailBinding, BindFailure> {
        let version = self
            .provisioner
            .create_version(&resource.id)
            .await
            .map_err(|source| {
                warn!(
                    "Version step failed for guardrail {}; resource retained",
                    resource.id
                );
                BindFailure::Version {
                    resource: resource.clone(),
                    source,
                }
            })?;

        // The pair must be internally consistent before anyone can observe it
        if version.parent_resource_id != resource.id {
            return Err(BindFailure::Version {
                resource: resource.clone(),
                source: ProvisionError::OrphanVersion {
                    version_id: version.version_id,
                    expected_parent: resource.id.clone(),
                    actual_parent: version.parent_resource_id,
                },
            });
        }

        info!(
            "Published version {} of guardrail {}",
            version.version_id, resource.id
        );
        Ok(GuardrailBinding::new(resource.clone(), version))
    }
}
