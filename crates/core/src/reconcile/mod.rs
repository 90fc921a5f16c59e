//! Status reconciliation between the registry and the encoding provider.
//!
//! State machine for an asset, as far as this crate is concerned:
//! - `TODO --job submitted--> ACTIVE`
//! - `ACTIVE --provider in flight--> ACTIVE` (observation refreshed)
//! - `ACTIVE --provider finished--> SUCCESS`
//! - `ACTIVE --provider error / unknown state / status unavailable--> FAIL`
//!
//! REJECT is set elsewhere and never touched. SUCCESS and FAIL are terminal.

mod driver;
mod status;
mod types;

pub use driver::Reconciler;
pub use status::{assess, classify, Assessment, ProviderState, ACTIVE_STATES};
pub use types::{ActiveOutcome, CycleReport, PendingOutcome, ReconcileOptions};
