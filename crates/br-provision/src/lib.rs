//! Guardrail provisioning
//!
//! A guardrail version is only meaningful once its parent resource exists, so
//! provisioning is a strictly ordered two-step sequence: create the resource,
//! then publish a version against it. The [`Binder`] runs that sequence and
//! returns a [`GuardrailBinding`] carrying the dependency edge, which teardown
//! honors in reverse (version before resource).

pub mod binder;
pub mod binding;
pub mod provisioner;

pub use binder::{BindFailure, Binder};
pub use binding::{DependencyEdge, GuardrailBinding, ProvisionTarget};
pub use provisioner::{GuardrailProvisioner, ProvisionError};
