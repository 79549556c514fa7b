//! Provisioned pairs and their creation-order dependency edge

use br_types::{GuardrailResource, GuardrailVersion};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::provisioner::{GuardrailProvisioner, ProvisionError};

/// One endpoint of a creation-order dependency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ProvisionTarget {
    Resource {
        id: String,
    },
    Version {
        resource_id: String,
        version_id: String,
    },
}

impl std::fmt::Display for ProvisionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resource { id } => write!(f, "guardrail {}", id),
            Self::Version {
                resource_id,
                version_id,
            } => write!(f, "guardrail {} version {}", resource_id, version_id),
        }
    }
}

/// Directed ordering constraint between two provisioning operations:
/// `dependent` must never be observed without `prerequisite` existing first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEdge {
    pub dependent: ProvisionTarget,
    pub prerequisite: ProvisionTarget,
}

/// A provisioned (resource, version) pair.
///
/// The embedded edge is the contract consumers must honor: the version was
/// created after the resource, and teardown runs in the reverse order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailBinding {
    pub resource: GuardrailResource,
    pub version: GuardrailVersion,
    pub edge: DependencyEdge,
}

impl GuardrailBinding {
    pub(crate) fn new(resource: GuardrailResource, version: GuardrailVersion) -> Self {
        let edge = DependencyEdge {
            dependent: ProvisionTarget::Version {
                resource_id: version.parent_resource_id.clone(),
                version_id: version.version_id.clone(),
            },
            prerequisite: ProvisionTarget::Resource {
                id: resource.id.clone(),
            },
        };
        Self {
            resource,
            version,
            edge,
        }
    }

    /// Rebuild the binding for an already-provisioned pair, e.g. ahead of
    /// teardown. Fails if the version does not reference the resource.
    pub fn from_parts(
        resource: GuardrailResource,
        version: GuardrailVersion,
    ) -> Result<Self, ProvisionError> {
        if version.parent_resource_id != resource.id {
            return Err(ProvisionError::OrphanVersion {
                version_id: version.version_id,
                expected_parent: resource.id,
                actual_parent: version.parent_resource_id,
            });
        }
        Ok(Self::new(resource, version))
    }

    /// Destruction order honoring the dependency edge: dependent first
    pub fn teardown_order(&self) -> [ProvisionTarget; 2] {
        [self.edge.dependent.clone(), self.edge.prerequisite.clone()]
    }

    /// Destroy the pair, version before resource.
    ///
    /// Stops on the first failure; the resource is never deleted while its
    /// version may still exist.
    pub async fn teardown(
        &self,
        provisioner: &dyn GuardrailProvisioner,
    ) -> Result<(), ProvisionError> {
        info!(
            "Tearing down guardrail {} (version {} first)",
            self.resource.id, self.version.version_id
        );

        provisioner
            .delete_version(&self.resource.id, &self.version.version_id)
            .await?;
        debug!(
            "Deleted version {} of guardrail {}",
            self.version.version_id, self.resource.id
        );

        provisioner.delete_guardrail(&self.resource.id).await?;
        debug!("Deleted guardrail {}", self.resource.id);

        Ok(())
    }
}
