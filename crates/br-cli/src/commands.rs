//! Command implementations

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use br_listing::{DirectoryService, GuardrailDirectory, ListingSettings, ProviderGuardrails};
use br_provider::ProviderClient;
use br_provision::{BindFailure, Binder, GuardrailBinding};
use br_selection::SelectionSynchronizer;
use br_types::{GuardrailDraft, GuardrailListOutput, GuardrailResource, GuardrailVersion};
use chrono::Utc;
use tracing::info;

use crate::cli::{Cli, Command};

/// Environment variable naming the provider API base URL
pub const ENDPOINT_ENV: &str = "BOTRAIL_ENDPOINT";

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let endpoint = cli
        .endpoint
        .or_else(|| std::env::var(ENDPOINT_ENV).ok())
        .filter(|v| !v.is_empty())
        .with_context(|| {
            format!("no provider endpoint: pass --endpoint or set {}", ENDPOINT_ENV)
        })?;
    let client = Arc::new(ProviderClient::new(endpoint));

    match cli.command {
        Command::List { json } => list(client, json).await,
        Command::Provision { name, config_file } => provision(client, name, &config_file).await,
        Command::Publish { id } => publish(client, &id).await,
        Command::Teardown { id, version } => teardown(client, &id, &version).await,
        Command::Resolve => resolve(client).await,
    }
}

fn directory(client: Arc<ProviderClient>) -> Arc<DirectoryService> {
    Arc::new(DirectoryService::new(client, ListingSettings::from_env()))
}

async fn list(client: Arc<ProviderClient>, json: bool) -> anyhow::Result<()> {
    let listing = directory(client)
        .fetch_guardrails()
        .await?
        .unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if listing.guardrails.is_empty() {
        println!("No guardrails configured.");
        return Ok(());
    }

    print_listing(&listing);
    Ok(())
}

fn print_listing(listing: &GuardrailListOutput) {
    for guardrail in &listing.guardrails {
        let marker = if guardrail.default { " (default)" } else { "" };
        println!(
            "{}  {}{}  versions: {}",
            guardrail.id,
            guardrail.name,
            marker,
            guardrail.versions.join(", ")
        );
    }
}

async fn provision(
    client: Arc<ProviderClient>,
    name: String,
    config_file: &Path,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(config_file)
        .with_context(|| format!("failed to read {}", config_file.display()))?;
    let policy: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", config_file.display()))?;

    let binder = Binder::new(client);
    match binder.bind(&GuardrailDraft { name, policy }).await {
        Ok(binding) => {
            println!(
                "Provisioned guardrail {} version {}",
                binding.resource.id, binding.version.version_id
            );
            Ok(())
        }
        Err(BindFailure::Version { resource, source }) => {
            bail!(
                "guardrail {} was created but the version step failed: {}.\n\
                 Retry with: botrail publish --id {}",
                resource.id,
                source,
                resource.id
            );
        }
        Err(err @ BindFailure::Resource { .. }) => Err(err.into()),
    }
}

async fn publish(client: Arc<ProviderClient>, id: &str) -> anyhow::Result<()> {
    let resource = lookup_resource(client.as_ref(), id).await?;

    let binder = Binder::new(client);
    let binding = binder.bind_version(&resource).await?;
    println!(
        "Published version {} of guardrail {}",
        binding.version.version_id, binding.resource.id
    );
    Ok(())
}

async fn teardown(client: Arc<ProviderClient>, id: &str, version: &str) -> anyhow::Result<()> {
    let resource = lookup_resource(client.as_ref(), id).await?;
    let version = GuardrailVersion {
        version_id: version.to_string(),
        parent_resource_id: resource.id.clone(),
        created_at: Utc::now(),
    };

    let binding = GuardrailBinding::from_parts(resource, version)?;
    binding.teardown(client.as_ref()).await?;
    println!("Tore down guardrail {}", id);
    Ok(())
}

async fn resolve(client: Arc<ProviderClient>) -> anyhow::Result<()> {
    let sync = SelectionSynchronizer::new(directory(client));
    sync.activate().await?;

    let selection = sync.selection();
    if selection.is_unset() {
        println!("No default guardrail would be selected.");
    } else {
        println!(
            "A fresh session would select guardrail {} version {}.",
            selection.resource_id, selection.version_id
        );
    }

    let options = sync.resource_options();
    if !options.is_empty() {
        println!("Available:");
        for option in options {
            println!("  {}  {}", option.value, option.label);
        }
    }
    Ok(())
}

async fn lookup_resource(client: &ProviderClient, id: &str) -> anyhow::Result<GuardrailResource> {
    let rows = client.list_guardrails(None).await?;
    let row = rows
        .into_iter()
        .find(|g| g.id == id)
        .with_context(|| format!("guardrail {} not found", id))?;
    info!("Resolved guardrail {} ({})", row.id, row.status);
    Ok(row.into_resource_handle())
}
