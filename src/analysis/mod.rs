// Charge-transition algorithms
pub mod charge_transfer;
pub mod cluster_stats;
pub mod feature_vector;
pub mod locality;
pub mod region_charge;

// Re-export commonly used types
pub use charge_transfer::{DonorAcceptorSplit, classify, compute_transfer_and_difference};
pub use cluster_stats::{
    ClusterAggregation, ClusterGroup, ClusterStatistic, ClusterSummary, ClusterTables,
    SeriesStatistics, group_by_cluster,
};
pub use feature_vector::{FeatureOptions, FeatureSelection, select_features};
pub use locality::compute_locality;
pub use region_charge::{RegionCharges, sum_by_region, sum_by_region_then_subgroup};
