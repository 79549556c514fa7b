//! Out-of-band failure reporting

use br_listing::ListingError;
use tracing::error;

/// Receives listing fetch failures for out-of-band logging.
/// Fire-and-forget: nothing is relied upon from the implementation.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, err: &ListingError);
}

/// Default reporter: logs through `tracing`
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, err: &ListingError) {
        error!("Guardrail listing fetch failed: {}", err);
    }
}
