pub mod commands;
pub mod core;

// Re-export key components
pub use commands::{run_ensemble, run_features, run_regions};
pub use core::{EnsembleReport, TransitionPipeline, region_charges, transition_tables};
