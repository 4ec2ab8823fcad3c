// Adapters between files / tabular collaborators and the analysis inputs
pub mod ensemble;
pub mod json_file;
pub mod subgroup_file;

// Re-export commonly used types
pub use ensemble::{EnsembleFrame, FrameColumn};
pub use json_file::{load_from_path, save_to_path};
pub use subgroup_file::{load_subgroups, parse_subgroups};
