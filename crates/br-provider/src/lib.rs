//! Guardrail provider REST client
//!
//! One client implements both collaborator contracts: the raw listing call
//! behind [`br_listing::ProviderGuardrails`] and the lifecycle calls behind
//! [`br_provision::GuardrailProvisioner`].

pub mod client;

pub use client::ProviderClient;
