//! Session-level synchronizer tests: the fetch window, teardown during the
//! fetch, and the full select-default-then-switch flow.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use br_listing::{GuardrailDirectory, ListingError};
use br_selection::{ErrorReporter, SelectionSynchronizer};
use br_types::{GuardrailListOutput, GuardrailSummary, SelectionState};
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Directory whose fetch blocks until the test releases it
struct GatedDirectory {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    result: Mutex<Option<Result<Option<GuardrailListOutput>, ListingError>>>,
}

impl GatedDirectory {
    fn new(
        result: Result<Option<GuardrailListOutput>, ListingError>,
    ) -> (Arc<Self>, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let directory = Arc::new(Self {
            gate: Mutex::new(Some(rx)),
            result: Mutex::new(Some(result)),
        });
        (directory, tx)
    }
}

#[async_trait::async_trait]
impl GuardrailDirectory for GatedDirectory {
    async fn fetch_guardrails(&self) -> Result<Option<GuardrailListOutput>, ListingError> {
        let gate = self.gate.lock().take().expect("single fetch per session");
        gate.await.ok();
        self.result.lock().take().expect("single fetch per session")
    }
}

struct CountingReporter {
    count: AtomicUsize,
}

impl ErrorReporter for CountingReporter {
    fn report(&self, _err: &ListingError) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

fn summary(id: &str, name: &str, versions: &[&str], default: bool) -> GuardrailSummary {
    GuardrailSummary {
        id: id.to_string(),
        name: name.to_string(),
        versions: versions.iter().map(|v| v.to_string()).collect(),
        default,
    }
}

fn listing() -> GuardrailListOutput {
    GuardrailListOutput {
        guardrails: vec![
            summary("a", "Alpha", &["1"], false),
            summary("b", "Beta", &["2", "1"], true),
        ],
    }
}

#[tokio::test]
async fn test_choice_made_while_loading_blocks_default_resolution() {
    let (directory, release) = GatedDirectory::new(Ok(Some(listing())));
    let sync = SelectionSynchronizer::new(directory);

    let handle = sync.activate();
    assert!(sync.is_loading());

    // The caller picks a resource before the listing is known
    sync.set_resource_id("a");

    release.send(()).unwrap();
    handle.await.unwrap();

    assert!(!sync.is_loading());
    // The explicit choice survives; no default override. The version stays
    // empty until re-picked because the listing was unknown at set time.
    assert_eq!(sync.selection(), SelectionState::new("a", ""));
    assert_eq!(sync.versions_for_current_selection(), vec!["1"]);
}

#[tokio::test]
async fn test_fetch_resolving_after_drop_is_a_noop() {
    let reporter = Arc::new(CountingReporter {
        count: AtomicUsize::new(0),
    });
    let (directory, release) =
        GatedDirectory::new(Err(ListingError::Provider("listing down".into())));
    let sync = SelectionSynchronizer::with_reporter(directory, reporter.clone());

    let handle = sync.activate();
    drop(sync);

    release.send(()).unwrap();
    handle.await.unwrap();

    // The failure resolved against a torn-down synchronizer: nothing to
    // mutate, nothing to report
    assert_eq!(reporter.count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_default_selection_then_manual_switch() {
    let (directory, release) = GatedDirectory::new(Ok(Some(listing())));
    let sync = SelectionSynchronizer::new(directory);

    let handle = sync.activate();
    release.send(()).unwrap();
    handle.await.unwrap();

    // Default resolution lands on Beta and its newest version
    assert_eq!(sync.selection(), SelectionState::new("b", "2"));

    // Switching resources force-resets the version to Alpha's first entry
    sync.set_resource_id("a");
    assert_eq!(sync.selection(), SelectionState::new("a", "1"));

    // An explicit version pick within the current resource sticks
    sync.set_resource_id("b");
    sync.set_version_id("1");
    assert_eq!(sync.selection(), SelectionState::new("b", "1"));
}
