//! Output file naming

/// File names for the tables written by the binary
pub struct OutputFiles {
    pub extension: &'static str,
    pub ensemble_transfer: &'static str,
    pub locality: &'static str,
    pub cluster_stats: &'static str,
    pub cluster_diff: &'static str,
    pub cluster_mean_variance: &'static str,
    pub cluster_locality: &'static str,
    pub cluster_mean_transfer: &'static str,
    pub region_charge: &'static str,
    pub subgroup_charge: &'static str,
    pub features: &'static str,
}

pub const OUTPUT: OutputFiles = OutputFiles {
    extension: "json",
    ensemble_transfer: "ensemble_transfer",
    locality: "measure_of_locality",
    cluster_stats: "cluster_stats",
    cluster_diff: "cluster_diff",
    cluster_mean_variance: "cluster_mean_variance",
    cluster_locality: "cluster_locality",
    cluster_mean_transfer: "cluster_mean_transfer",
    region_charge: "charge_per_region",
    subgroup_charge: "charge_per_subgroup",
    features: "feature_vector",
};

/// Example: "cluster_stats.json"
pub fn table_filename(stem: &str) -> String {
    format!("{}.{}", stem, OUTPUT.extension)
}
