//! The selection synchronizer state machine

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use br_listing::{GuardrailDirectory, ListingError};
use br_types::{GuardrailListOutput, GuardrailSummary, SelectOption, SelectionState};
use parking_lot::RwLock;
use tracing::debug;

use crate::reporter::{ErrorReporter, TracingErrorReporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

struct State {
    phase: Phase,
    /// Listing in the order the directory returned it
    options: Vec<GuardrailSummary>,
    /// Id-indexed lookup; duplicate ids overwrite, last wins
    by_id: HashMap<String, GuardrailSummary>,
    selection: SelectionState,
}

struct Inner {
    directory: Arc<dyn GuardrailDirectory>,
    reporter: Arc<dyn ErrorReporter>,
    state: RwLock<State>,
}

/// Holds the (resource, version) selection for one bot-configuration session.
///
/// One listing fetch per session: [`activate`](SelectionSynchronizer::activate)
/// starts it, default resolution runs once when it resolves. Every mutation
/// (either setter, fetch completion) runs to completion under the state's
/// write lock, so updates never interleave.
pub struct SelectionSynchronizer {
    inner: Arc<Inner>,
}

impl SelectionSynchronizer {
    /// Create a synchronizer reporting failures through `tracing`
    pub fn new(directory: Arc<dyn GuardrailDirectory>) -> Self {
        Self::with_reporter(directory, Arc::new(TracingErrorReporter))
    }

    pub fn with_reporter(
        directory: Arc<dyn GuardrailDirectory>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                directory,
                reporter,
                state: RwLock::new(State {
                    phase: Phase::Uninitialized,
                    options: Vec::new(),
                    by_id: HashMap::new(),
                    selection: SelectionState::default(),
                }),
            }),
        }
    }

    /// Seed an externally supplied selection before activation.
    /// A non-empty resource id here is never overridden by default resolution.
    pub fn preselect(self, selection: SelectionState) -> Self {
        self.inner.state.write().selection = selection;
        self
    }

    /// Start the one-time listing fetch. Later calls are no-ops.
    ///
    /// The spawned task holds only a weak handle to this synchronizer, so a
    /// fetch resolving after the synchronizer was dropped changes nothing.
    pub fn activate(&self) -> tokio::task::JoinHandle<()> {
        {
            let mut state = self.inner.state.write();
            if state.phase != Phase::Uninitialized {
                debug!("Selection synchronizer already activated");
                return tokio::spawn(async {});
            }
            state.phase = Phase::Loading;
        }

        let inner = Arc::downgrade(&self.inner);
        tokio::spawn(run_fetch(inner))
    }

    /// True between activation and fetch resolution
    pub fn is_loading(&self) -> bool {
        self.inner.state.read().phase == Phase::Loading
    }

    pub fn selection(&self) -> SelectionState {
        self.inner.state.read().selection.clone()
    }

    /// The fetched listing, in directory order
    pub fn options(&self) -> Vec<GuardrailSummary> {
        self.inner.state.read().options.clone()
    }

    /// Select a guardrail resource.
    ///
    /// Always re-picks the version: the first entry of the new resource's
    /// version list, or empty when the id is unknown or has no versions. The
    /// version is never left pointing at a different resource's entry.
    pub fn set_resource_id(&self, id: impl Into<String>) {
        let id = id.into();
        let mut state = self.inner.state.write();
        let first_version = state
            .by_id
            .get(&id)
            .and_then(|g| g.versions.first())
            .cloned()
            .unwrap_or_default();
        state.selection = SelectionState::new(id, first_version);
    }

    /// Select a version of the current resource.
    ///
    /// Membership is not re-validated here; callers offer only the list from
    /// [`version_options`](SelectionSynchronizer::version_options).
    pub fn set_version_id(&self, version_id: impl Into<String>) {
        self.inner.state.write().selection.version_id = version_id.into();
    }

    /// Version ids of the currently selected resource, or empty when the
    /// selection is unset or references an unknown id. Never fails.
    pub fn versions_for_current_selection(&self) -> Vec<String> {
        let state = self.inner.state.read();
        state
            .by_id
            .get(&state.selection.resource_id)
            .map(|g| g.versions.clone())
            .unwrap_or_default()
    }

    /// Resource dropdown entries: value = id, label = name.
    /// Duplicate ids collapse to one entry (first position, last label).
    pub fn resource_options(&self) -> Vec<SelectOption> {
        let state = self.inner.state.read();
        let mut seen: Vec<&str> = Vec::new();
        for guardrail in &state.options {
            if !seen.contains(&guardrail.id.as_str()) {
                seen.push(guardrail.id.as_str());
            }
        }
        seen.into_iter()
            .filter_map(|id| state.by_id.get(id))
            .map(|g| SelectOption::new(g.id.as_str(), g.name.as_str()))
            .collect()
    }

    /// Version dropdown entries for the current resource; label == value
    pub fn version_options(&self) -> Vec<SelectOption> {
        self.versions_for_current_selection()
            .into_iter()
            .map(|v| SelectOption::new(v.clone(), v))
            .collect()
    }
}

async fn run_fetch(inner: Weak<Inner>) {
    // Only the directory handle is kept alive across the await; the state
    // itself is re-acquired afterwards so a dropped owner makes this a no-op.
    let directory = match inner.upgrade() {
        Some(strong) => strong.directory.clone(),
        None => return,
    };

    let result = directory.fetch_guardrails().await;

    match inner.upgrade() {
        Some(strong) => strong.apply_fetch_result(result),
        None => debug!("Selection synchronizer dropped before fetch resolved; ignoring result"),
    }
}

impl Inner {
    fn apply_fetch_result(&self, result: Result<Option<GuardrailListOutput>, ListingError>) {
        let mut state = self.state.write();

        match result {
            Ok(payload) => {
                // A missing payload reads the same as an empty listing
                let guardrails = payload.map(|p| p.guardrails).unwrap_or_default();
                state.by_id = guardrails
                    .iter()
                    .map(|g| (g.id.clone(), g.clone()))
                    .collect();
                state.options = guardrails;

                // Default resolution runs once, and never overrides a choice
                // made before the fetch resolved
                if state.selection.is_unset() {
                    let default = state.options.iter().find(|g| g.default).map(|g| {
                        (
                            g.id.clone(),
                            g.versions.first().cloned().unwrap_or_default(),
                        )
                    });
                    if let Some((id, version)) = default {
                        debug!("Auto-selecting default guardrail {} version {}", id, version);
                        state.selection = SelectionState::new(id, version);
                    }
                }
            }
            Err(err) => {
                self.reporter.report(&err);
                state.options.clear();
                state.by_id.clear();
            }
        }

        state.phase = Phase::Ready;
    }
}
