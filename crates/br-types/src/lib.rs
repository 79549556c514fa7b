//! Shared types and error types for BotRail

pub mod errors;
pub mod guardrail;

pub use errors::{RailError, RailResult};
pub use guardrail::*;
