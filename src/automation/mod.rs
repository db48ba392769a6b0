/// Batch processing of the inbox
pub mod orchestrator;


pub use orchestrator::{BatchOrchestrator, BatchReport, FileOutcome};
