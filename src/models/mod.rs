// Output containers handed back to collaborators

pub mod table;

// Re-export key types for convenience
pub use table::{Column, ColumnData, DataTable};
