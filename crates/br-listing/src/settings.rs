//! Listing configuration

/// Environment variable naming the guardrail to flag as the default
pub const DEFAULT_GUARDRAIL_ID_ENV: &str = "DEFAULT_GUARDRAIL_ID";

#[derive(Debug, Clone, Default)]
pub struct ListingSettings {
    /// Guardrail id flagged `default: true` in the aggregated listing
    pub default_guardrail_id: Option<String>,
}

impl ListingSettings {
    /// Read settings from the environment. An unset or empty
    /// `DEFAULT_GUARDRAIL_ID` means no entry gets the default flag.
    pub fn from_env() -> Self {
        let default_guardrail_id = std::env::var(DEFAULT_GUARDRAIL_ID_ENV)
            .ok()
            .filter(|v| !v.is_empty());
        Self {
            default_guardrail_id,
        }
    }

    pub fn with_default(id: impl Into<String>) -> Self {
        Self {
            default_guardrail_id: Some(id.into()),
        }
    }

    pub fn is_default(&self, id: &str) -> bool {
        self.default_guardrail_id.as_deref() == Some(id)
    }
}
