//! Aggregates the provider's raw listing into client-visible summaries

use std::sync::Arc;

use br_types::{GuardrailListOutput, GuardrailSummary};
use tracing::{debug, info};

use crate::directory::{GuardrailDirectory, ListingError};
use crate::provider::ProviderGuardrails;
use crate::settings::ListingSettings;

/// Builds `GuardrailSummary` rows from the provider's listing API.
///
/// Only `READY` guardrails are offered; their versions are collected with a
/// second, id-filtered listing call and ordered newest first. Entries without
/// any published version are dropped — a summary's version list is never
/// empty.
pub struct DirectoryService {
    provider: Arc<dyn ProviderGuardrails>,
    settings: ListingSettings,
}

impl DirectoryService {
    pub fn new(provider: Arc<dyn ProviderGuardrails>, settings: ListingSettings) -> Self {
        Self { provider, settings }
    }
}

#[async_trait::async_trait]
impl GuardrailDirectory for DirectoryService {
    async fn fetch_guardrails(&self) -> Result<Option<GuardrailListOutput>, ListingError> {
        let all = self.provider.list_guardrails(None).await?;
        debug!("Provider listed {} guardrails", all.len());

        let mut summaries = Vec::new();
        for guardrail in all.into_iter().filter(|g| g.status.is_ready()) {
            let rows = self.provider.list_guardrails(Some(&guardrail.id)).await?;
            let mut versions: Vec<String> = rows.into_iter().filter_map(|r| r.version).collect();
            sort_versions_newest_first(&mut versions);

            if versions.is_empty() {
                debug!("Skipping guardrail {}: no published versions", guardrail.id);
                continue;
            }

            let default = self.settings.is_default(&guardrail.id);
            summaries.push(GuardrailSummary {
                id: guardrail.id,
                name: guardrail.name,
                versions,
                default,
            });
        }

        info!("Listing {} ready guardrails", summaries.len());
        Ok(Some(GuardrailListOutput {
            guardrails: summaries,
        }))
    }
}

/// Numeric version ids sort descending; non-numeric ids (e.g. DRAFT) sort
/// after all numeric ones, themselves in reverse lexicographic order.
fn sort_versions_newest_first(versions: &mut [String]) {
    versions.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => b.cmp(a),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderGuardrail;
    use br_types::{GuardrailStatus, DRAFT_VERSION};
    use std::collections::HashMap;

    struct StubProvider {
        guardrails: Vec<ProviderGuardrail>,
        versions_by_id: HashMap<String, Vec<String>>,
        fail: bool,
    }

    impl StubProvider {
        fn new(guardrails: Vec<ProviderGuardrail>) -> Self {
            Self {
                guardrails,
                versions_by_id: HashMap::new(),
                fail: false,
            }
        }

        fn versions(mut self, id: &str, versions: &[&str]) -> Self {
            self.versions_by_id
                .insert(id.to_string(), versions.iter().map(|v| v.to_string()).collect());
            self
        }
    }

    fn row(id: &str, name: &str, status: GuardrailStatus) -> ProviderGuardrail {
        ProviderGuardrail {
            id: id.to_string(),
            name: name.to_string(),
            status,
            version: None,
            created_at: None,
        }
    }

    #[async_trait::async_trait]
    impl ProviderGuardrails for StubProvider {
        async fn list_guardrails(
            &self,
            filter_id: Option<&str>,
        ) -> Result<Vec<ProviderGuardrail>, ListingError> {
            if self.fail {
                return Err(ListingError::Provider("boom".to_string()));
            }
            match filter_id {
                None => Ok(self.guardrails.clone()),
                Some(id) => {
                    let base = self
                        .guardrails
                        .iter()
                        .find(|g| g.id == id)
                        .cloned()
                        .unwrap_or_else(|| row(id, "", GuardrailStatus::Ready));
                    Ok(self
                        .versions_by_id
                        .get(id)
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .map(|v| ProviderGuardrail {
                            version: Some(v),
                            ..base.clone()
                        })
                        .collect())
                }
            }
        }
    }

    async fn fetch(provider: StubProvider, settings: ListingSettings) -> GuardrailListOutput {
        DirectoryService::new(Arc::new(provider), settings)
            .fetch_guardrails()
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_filters_out_non_ready_guardrails() {
        let provider = StubProvider::new(vec![
            row("gr-a", "Alpha", GuardrailStatus::Ready),
            row("gr-b", "Beta", GuardrailStatus::Creating),
            row("gr-c", "Gamma", GuardrailStatus::Failed),
        ])
        .versions("gr-a", &["1"])
        .versions("gr-b", &["1"])
        .versions("gr-c", &["1"]);

        let output = fetch(provider, ListingSettings::default()).await;
        let ids: Vec<&str> = output.guardrails.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["gr-a"]);
    }

    #[tokio::test]
    async fn test_orders_versions_newest_first() {
        let provider = StubProvider::new(vec![row("gr-a", "Alpha", GuardrailStatus::Ready)])
            .versions("gr-a", &["1", DRAFT_VERSION, "2", "10"]);

        let output = fetch(provider, ListingSettings::default()).await;
        assert_eq!(
            output.guardrails[0].versions,
            vec!["10", "2", "1", DRAFT_VERSION]
        );
    }

    #[tokio::test]
    async fn test_flags_configured_default() {
        let provider = StubProvider::new(vec![
            row("gr-a", "Alpha", GuardrailStatus::Ready),
            row("gr-b", "Beta", GuardrailStatus::Ready),
        ])
        .versions("gr-a", &["1"])
        .versions("gr-b", &["2", "1"]);

        let output = fetch(provider, ListingSettings::with_default("gr-b")).await;
        let defaults: Vec<(&str, bool)> = output
            .guardrails
            .iter()
            .map(|g| (g.id.as_str(), g.default))
            .collect();
        assert_eq!(defaults, vec![("gr-a", false), ("gr-b", true)]);
    }

    #[tokio::test]
    async fn test_drops_guardrails_without_published_versions() {
        let provider = StubProvider::new(vec![
            row("gr-a", "Alpha", GuardrailStatus::Ready),
            row("gr-b", "Beta", GuardrailStatus::Ready),
        ])
        .versions("gr-a", &[]);
        // gr-b has no version rows at all

        let output = fetch(provider, ListingSettings::default()).await;
        assert!(output.guardrails.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = StubProvider {
            fail: true,
            ..StubProvider::new(vec![])
        };
        let service = DirectoryService::new(Arc::new(provider), ListingSettings::default());
        assert!(service.fetch_guardrails().await.is_err());
    }

    #[test]
    fn test_sort_handles_mixed_ids() {
        let mut versions = vec![
            "DRAFT".to_string(),
            "3".to_string(),
            "21".to_string(),
            "archive".to_string(),
        ];
        sort_versions_newest_first(&mut versions);
        assert_eq!(versions, vec!["21", "3", "archive", "DRAFT"]);
    }
}
