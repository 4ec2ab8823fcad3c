//! Column naming used when talking to tabular collaborators.
//!
//! Subgroup numbers in column names are 1-based.

pub struct ColumnNames {
    pub cluster: &'static str,
    pub cluster_size: &'static str,
    pub charge_difference: &'static str,
    pub measure_of_locality: &'static str,
    pub mean_measure_of_locality: &'static str,
    pub segmented_region: &'static str,
    pub region_charge: &'static str,
    pub region_charge_pct: &'static str,
    pub subgroup: &'static str,
    pub subgroup_charge: &'static str,
}

pub const COLUMNS: ColumnNames = ColumnNames {
    cluster: "Cluster",
    cluster_size: "Cluster size",
    charge_difference: "Charge difference",
    measure_of_locality: "Measure of locality",
    mean_measure_of_locality: "Mean measure of locality",
    segmented_region: "Segmented region",
    region_charge: "Charge",
    region_charge_pct: "Charge [%]",
    subgroup: "subgroup",
    subgroup_charge: "charge_sg",
};

impl ColumnNames {
    /// Per-member input column, e.g. "Hole sg1"
    pub fn hole(&self, subgroup: usize) -> String {
        format!("Hole sg{}", subgroup)
    }

    /// Per-member input column, e.g. "Particle sg1"
    pub fn particle(&self, subgroup: usize) -> String {
        format!("Particle sg{}", subgroup)
    }

    /// Per-member charge difference, e.g. "Delta q sg1"
    pub fn delta_q(&self, subgroup: usize) -> String {
        format!("Delta q sg{}", subgroup)
    }

    /// Conceptual matrix entry (row, col), e.g. "Charge transfer 12"
    pub fn charge_transfer(&self, row: usize, col: usize) -> String {
        format!("Charge transfer {}{}", row, col)
    }

    /// Header of a single-transition transfer column, e.g. "1"
    pub fn transfer_column(&self, subgroup: usize) -> String {
        subgroup.to_string()
    }

    /// Statistic column, e.g. "Min hole charge sg 1"
    pub fn statistic(&self, statistic: &str, charge: &str, subgroup: usize) -> String {
        format!("{} {} charge sg {}", statistic, charge, subgroup)
    }
}
