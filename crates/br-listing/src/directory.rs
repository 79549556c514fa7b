//! The listing contract consumed by selection clients

use br_types::{GuardrailListOutput, RailError};
use thiserror::Error;

/// Listing error types
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Provider request failed: {0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ListingError> for RailError {
    fn from(err: ListingError) -> Self {
        RailError::Listing(err.to_string())
    }
}

/// Source of the client-visible guardrail listing.
///
/// `Ok(None)` and an empty list are equivalent to consumers: no guardrails
/// configured.
#[async_trait::async_trait]
pub trait GuardrailDirectory: Send + Sync {
    async fn fetch_guardrails(&self) -> Result<Option<GuardrailListOutput>, ListingError>;
}
