//! Guardrail listing aggregation
//!
//! Turns the provider's raw guardrail listing into the projection selection
//! clients consume: ready guardrails only, each with its published version ids
//! newest first, and at most one entry flagged as the default.

pub mod directory;
pub mod provider;
pub mod service;
pub mod settings;

pub use directory::{GuardrailDirectory, ListingError};
pub use provider::{ProviderGuardrail, ProviderGuardrails};
pub use service::DirectoryService;
pub use settings::{ListingSettings, DEFAULT_GUARDRAIL_ID_ENV};
