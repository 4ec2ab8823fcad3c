// Domain types and value objects
pub mod charge;
pub mod subgroup;
pub mod transfer_matrix;
pub mod volume;

// Re-export commonly used types
pub use charge::{ChargeKind, SubgroupCharges};
pub use subgroup::SubgroupDefinition;
pub use transfer_matrix::TransferMatrix;
pub use volume::{Dims3, IndexMapper3D, LabelVolume, ScalarVolume};
