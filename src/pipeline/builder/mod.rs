//! Build matrix orchestration and coordination.
//!
//! - [`orchestrator`] - Main [`BuildOrchestrator`] struct and run loop
//! - [`report`] - Per-target outcomes and the aggregated [`RunReport`]

mod orchestrator;
mod report;

pub use orchestrator::BuildOrchestrator;
pub use report::{RunReport, TargetOutcome, TargetState};
