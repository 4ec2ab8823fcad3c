//! Configuration module for the charge-transitions pipeline.

pub mod analysis;
pub mod columns;
pub mod persistence;

mod debug; // Private: use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use columns::COLUMNS;
pub use persistence::{OUTPUT, table_filename};
