//! Guardrail selection state for bot configuration clients
//!
//! The [`SelectionSynchronizer`] keeps a (resource id, version id) pair
//! consistent against the guardrail listing: it fetches the listing once,
//! auto-selects the default entry when the caller made no prior choice, and
//! force-resets the version whenever the resource changes so the two fields
//! can never point at mismatched entities.

pub mod reporter;
pub mod synchronizer;

pub use reporter::{ErrorReporter, TracingErrorReporter};
pub use synchronizer::SelectionSynchronizer;
