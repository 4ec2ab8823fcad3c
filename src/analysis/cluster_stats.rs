//! Per-cluster statistics of subgroup hole/particle charges.
//!
//! Members are grouped by their cluster id (groups ordered by first
//! appearance). For every cluster and subgroup the hole and particle series
//! restricted to the cluster's members are reduced to min, max, mean,
//! population variance and the legacy `max - min` spread. When a locality
//! series is supplied its per-cluster mean is reported as well.

use std::collections::HashMap;

use strum::IntoEnumIterator;

#[allow(unused_imports)]
use crate::config::DEBUG_FLAGS;
use crate::config::{ANALYSIS, COLUMNS};
use crate::domain::{ChargeKind, SubgroupCharges};
use crate::error::{ChargeError, ChargeResult};
use crate::models::{ColumnData, DataTable};
use crate::utils::{get_min_max, mean_value, standard_deviation, variance};

/// Member row indices sharing one cluster id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterGroup {
    pub cluster_id: i64,
    pub members: Vec<usize>,
}

/// Groups `index_ids` by the parallel `cluster_ids`.
///
/// The output is ordered by the first appearance of each cluster id; members
/// keep their input order.
pub fn group_by_cluster(cluster_ids: &[i64], index_ids: &[usize]) -> ChargeResult<Vec<ClusterGroup>> {
    if cluster_ids.len() != index_ids.len() {
        return Err(ChargeError::dimension_mismatch(
            index_ids.len(),
            cluster_ids.len(),
        ));
    }

    let mut position_of: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<ClusterGroup> = Vec::new();
    for (&cluster_id, &index) in cluster_ids.iter().zip(index_ids) {
        let pos = *position_of.entry(cluster_id).or_insert_with(|| {
            groups.push(ClusterGroup {
                cluster_id,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[pos].members.push(index);
    }
    Ok(groups)
}

/// Reduction of one charge series over the members of one cluster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population variance, `mean(x²) - mean²`
    pub variance: f64,
    pub std_dev: f64,
}

impl SeriesStatistics {
    /// `None` for an empty series
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let (min, max) = get_min_max(values);
        let mean = mean_value(values);
        Some(Self {
            min,
            max,
            mean,
            variance: variance(values, mean),
            std_dev: standard_deviation(values, mean),
        })
    }

    /// Legacy spread column, `max - min`
    pub fn diff(&self) -> f64 {
        self.max - self.min
    }
}

/// Hole and particle statistics for one (cluster, subgroup) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterStatistic {
    pub hole: SeriesStatistics,
    pub particle: SeriesStatistics,
}

impl ClusterStatistic {
    pub fn get(&self, kind: ChargeKind) -> &SeriesStatistics {
        match kind {
            ChargeKind::Hole => &self.hole,
            ChargeKind::Particle => &self.particle,
        }
    }
}

/// Everything computed for one cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub cluster_id: i64,
    pub size: usize,
    /// One entry per subgroup, in subgroup order
    pub subgroups: Vec<ClusterStatistic>,
    pub mean_locality: Option<f64>,
}

/// The tables produced by one aggregation, one row per cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterTables {
    /// Min / max hole and particle charge per subgroup
    pub stats: DataTable,
    /// `max - min` per subgroup
    pub diff: DataTable,
    /// Mean / variance (and optionally standard deviation) per subgroup
    pub mean_variance: DataTable,
    /// Mean measure of locality, only when locality values were supplied
    pub locality: Option<DataTable>,
}

/// Builder for one cluster aggregation.
///
/// ```
/// use charge_transitions::analysis::ClusterAggregation;
/// use charge_transitions::domain::SubgroupCharges;
///
/// let subgroups = vec![SubgroupCharges::new(vec![0.2, 0.4, 0.9], vec![0.1, 0.3, 0.5])];
/// let tables = ClusterAggregation::new(&[1, 1, 2], &[0, 1, 2], &subgroups)
///     .with_locality(&[0.5, 0.7, 0.1])
///     .aggregate()
///     .unwrap();
/// assert_eq!(tables.stats.rows(), 2);
/// assert!(tables.locality.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ClusterAggregation<'a> {
    cluster_ids: &'a [i64],
    index_ids: &'a [usize],
    subgroups: &'a [SubgroupCharges],
    locality: Option<&'a [f64]>,
    include_standard_deviation: bool,
}

impl<'a> ClusterAggregation<'a> {
    pub fn new(
        cluster_ids: &'a [i64],
        index_ids: &'a [usize],
        subgroups: &'a [SubgroupCharges],
    ) -> Self {
        Self {
            cluster_ids,
            index_ids,
            subgroups,
            locality: None,
            include_standard_deviation: ANALYSIS.cluster.include_standard_deviation,
        }
    }

    /// Per-member locality values, indexed like the charge series
    pub fn with_locality(mut self, locality: &'a [f64]) -> Self {
        self.locality = Some(locality);
        self
    }

    /// Adds standard deviation columns next to mean and variance
    pub fn with_standard_deviation(mut self, include: bool) -> Self {
        self.include_standard_deviation = include;
        self
    }

    fn check_indices(&self) -> ChargeResult<()> {
        if self.subgroups.is_empty() {
            return Err(ChargeError::invalid_input("no subgroups to aggregate"));
        }
        let max_index = match self.index_ids.iter().max() {
            Some(&m) => m,
            None => return Ok(()),
        };
        for (sg, charges) in self.subgroups.iter().enumerate() {
            if max_index >= charges.members() {
                return Err(ChargeError::invalid_input(format!(
                    "row index {} is out of range for subgroup {} ({} members)",
                    max_index,
                    sg + 1,
                    charges.members()
                )));
            }
        }
        if let Some(locality) = self.locality
            && max_index >= locality.len()
        {
            return Err(ChargeError::invalid_input(format!(
                "row index {} is out of range for the locality values ({} members)",
                max_index,
                locality.len()
            )));
        }
        Ok(())
    }

    /// Computes the per-cluster summaries without building tables
    pub fn summarize(&self) -> ChargeResult<Vec<ClusterSummary>> {
        let groups = group_by_cluster(self.cluster_ids, self.index_ids)?;
        self.check_indices()?;

        let mut summaries = Vec::with_capacity(groups.len());
        for group in groups {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_cluster_groups {
                log::debug!(
                    "Cluster {}: {} members {:?}",
                    group.cluster_id,
                    group.members.len(),
                    group.members
                );
            }

            let mut per_subgroup = Vec::with_capacity(self.subgroups.len());
            for charges in self.subgroups {
                let hole: Vec<f64> = group.members.iter().map(|&m| charges.hole[m]).collect();
                let particle: Vec<f64> =
                    group.members.iter().map(|&m| charges.particle[m]).collect();

                // Groups are built from observed members, so never empty
                let (Some(hole), Some(particle)) = (
                    SeriesStatistics::from_values(&hole),
                    SeriesStatistics::from_values(&particle),
                ) else {
                    return Err(ChargeError::invalid_input(format!(
                        "cluster {} has no members",
                        group.cluster_id
                    )));
                };
                per_subgroup.push(ClusterStatistic { hole, particle });
            }

            let mean_locality = self.locality.map(|locality| {
                let values: Vec<f64> = group.members.iter().map(|&m| locality[m]).collect();
                mean_value(&values)
            });

            summaries.push(ClusterSummary {
                cluster_id: group.cluster_id,
                size: group.members.len(),
                subgroups: per_subgroup,
                mean_locality,
            });
        }
        Ok(summaries)
    }

    /// Computes the summaries and lays them out as tables
    pub fn aggregate(&self) -> ChargeResult<ClusterTables> {
        let summaries = self.summarize()?;
        let tables = build_tables(
            &summaries,
            self.subgroups.len(),
            self.include_standard_deviation,
            self.locality.is_some(),
        )?;

        log::info!(
            "Cluster statistics: {} clusters over {} members, {} subgroups",
            summaries.len(),
            self.index_ids.len(),
            self.subgroups.len()
        );
        Ok(tables)
    }
}

fn table_with_cluster_columns(summaries: &[ClusterSummary]) -> ChargeResult<DataTable> {
    let mut table = DataTable::new(summaries.len());
    table.add_column(
        COLUMNS.cluster,
        ColumnData::Int(summaries.iter().map(|s| s.cluster_id).collect()),
    )?;
    table.add_column(
        COLUMNS.cluster_size,
        ColumnData::Size(summaries.iter().map(|s| s.size).collect()),
    )?;
    Ok(table)
}

fn collect_column(
    summaries: &[ClusterSummary],
    subgroup: usize,
    kind: ChargeKind,
    pick: impl Fn(&SeriesStatistics) -> f64,
) -> Vec<f64> {
    summaries
        .iter()
        .map(|s| pick(s.subgroups[subgroup].get(kind)))
        .collect()
}

fn build_tables(
    summaries: &[ClusterSummary],
    nr_subgroups: usize,
    include_standard_deviation: bool,
    include_locality: bool,
) -> ChargeResult<ClusterTables> {
    let mut stats = table_with_cluster_columns(summaries)?;
    let mut diff = table_with_cluster_columns(summaries)?;
    let mut mean_variance = table_with_cluster_columns(summaries)?;

    for sg in 0..nr_subgroups {
        let number = sg + 1;

        for kind in ChargeKind::iter() {
            let name = kind.to_string();
            stats.add_float_column(
                COLUMNS.statistic("Min", &name, number),
                collect_column(summaries, sg, kind, |s| s.min),
            )?;
            stats.add_float_column(
                COLUMNS.statistic("Max", &name, number),
                collect_column(summaries, sg, kind, |s| s.max),
            )?;
        }

        for kind in ChargeKind::iter() {
            diff.add_float_column(
                COLUMNS.statistic("Diff", &kind.to_string(), number),
                collect_column(summaries, sg, kind, |s| s.diff()),
            )?;
        }

        for kind in ChargeKind::iter() {
            let name = kind.to_string();
            mean_variance.add_float_column(
                COLUMNS.statistic("Mean", &name, number),
                collect_column(summaries, sg, kind, |s| s.mean),
            )?;
            mean_variance.add_float_column(
                COLUMNS.statistic("Variance", &name, number),
                collect_column(summaries, sg, kind, |s| s.variance),
            )?;
            if include_standard_deviation {
                mean_variance.add_float_column(
                    COLUMNS.statistic("Stdev", &name, number),
                    collect_column(summaries, sg, kind, |s| s.std_dev),
                )?;
            }
        }
    }

    let locality = if include_locality {
        let mut table = table_with_cluster_columns(summaries)?;
        table.add_float_column(
            COLUMNS.mean_measure_of_locality,
            summaries
                .iter()
                .map(|s| s.mean_locality.unwrap_or(f64::NAN))
                .collect(),
        )?;
        Some(table)
    } else {
        None
    };

    Ok(ClusterTables {
        stats,
        diff,
        mean_variance,
        locality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_subgroups() -> Vec<SubgroupCharges> {
        vec![
            SubgroupCharges::new(vec![0.2, 0.4, 0.9, 0.1], vec![0.5, 0.3, 0.2, 0.6]),
            SubgroupCharges::new(vec![0.8, 0.6, 0.1, 0.9], vec![0.5, 0.7, 0.8, 0.4]),
        ]
    }

    #[test]
    fn test_groups_follow_first_appearance() {
        let groups = group_by_cluster(&[7, 2, 7, 5], &[0, 1, 2, 3]).unwrap();
        let ids: Vec<i64> = groups.iter().map(|g| g.cluster_id).collect();
        assert_eq!(ids, vec![7, 2, 5]);
        assert_eq!(groups[0].members, vec![0, 2]);
        assert_eq!(groups[2].members, vec![3]);
    }

    #[test]
    fn test_grouping_rejects_mismatched_columns() {
        let err = group_by_cluster(&[1, 2], &[0]).unwrap_err();
        assert!(matches!(err, ChargeError::InvalidInput { .. }));
    }

    #[test]
    fn test_series_statistics() {
        let stats = SeriesStatistics::from_values(&[8.0, 10.0, 15.0]).unwrap();
        assert_eq!(stats.min, 8.0);
        assert_eq!(stats.max, 15.0);
        assert!((stats.mean - 11.0).abs() < 1e-12);
        assert!((stats.variance - 8.66667).abs() < 1e-5);
        assert_eq!(stats.diff(), 7.0);
        assert!(SeriesStatistics::from_values(&[]).is_none());
    }

    #[test]
    fn test_two_clusters_row_count_and_sizes() {
        let subgroups = two_subgroups();
        let tables = ClusterAggregation::new(&[1, 1, 2], &[0, 1, 2], &subgroups)
            .aggregate()
            .unwrap();

        for table in [&tables.stats, &tables.diff, &tables.mean_variance] {
            assert_eq!(table.rows(), 2);
            assert_eq!(table.column("Cluster"), Some(&ColumnData::Int(vec![1, 2])));
            assert_eq!(
                table.column("Cluster size"),
                Some(&ColumnData::Size(vec![2, 1]))
            );
        }
        assert!(tables.locality.is_none());
    }

    #[test]
    fn test_min_mean_max_ordering_per_cluster() {
        let subgroups = two_subgroups();
        let summaries = ClusterAggregation::new(&[3, 4, 3, 3], &[0, 1, 2, 3], &subgroups)
            .summarize()
            .unwrap();

        for summary in &summaries {
            for statistic in &summary.subgroups {
                for kind in ChargeKind::iter() {
                    let s = statistic.get(kind);
                    assert!(s.min <= s.mean && s.mean <= s.max);
                    assert!(s.variance >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_statistic_values() {
        let subgroups = two_subgroups();
        let tables = ClusterAggregation::new(&[1, 1, 2], &[0, 1, 2], &subgroups)
            .aggregate()
            .unwrap();

        let min_hole = tables.stats.float_column("Min hole charge sg 1").unwrap();
        let max_hole = tables.stats.float_column("Max hole charge sg 1").unwrap();
        assert_eq!(min_hole, &[0.2, 0.9]);
        assert_eq!(max_hole, &[0.4, 0.9]);

        let diff_particle = tables
            .diff
            .float_column("Diff particle charge sg 2")
            .unwrap();
        assert!((diff_particle[0] - 0.2).abs() < 1e-12);
        assert_eq!(diff_particle[1], 0.0);

        let mean_hole = tables
            .mean_variance
            .float_column("Mean hole charge sg 1")
            .unwrap();
        let var_hole = tables
            .mean_variance
            .float_column("Variance hole charge sg 1")
            .unwrap();
        assert!((mean_hole[0] - 0.3).abs() < 1e-12);
        assert!((var_hole[0] - 0.01).abs() < 1e-12);
        assert_eq!(var_hole[1], 0.0);
    }

    #[test]
    fn test_column_layout() {
        let subgroups = two_subgroups();
        let tables = ClusterAggregation::new(&[1], &[0], &subgroups)
            .aggregate()
            .unwrap();
        assert_eq!(
            tables.stats.headers(),
            vec![
                "Cluster",
                "Cluster size",
                "Min hole charge sg 1",
                "Max hole charge sg 1",
                "Min particle charge sg 1",
                "Max particle charge sg 1",
                "Min hole charge sg 2",
                "Max hole charge sg 2",
                "Min particle charge sg 2",
                "Max particle charge sg 2",
            ]
        );
        assert_eq!(tables.mean_variance.columns().len(), 2 + 2 * 4);
    }

    #[test]
    fn test_standard_deviation_columns_are_optional() {
        let subgroups = two_subgroups();
        let tables = ClusterAggregation::new(&[1, 1], &[0, 1], &subgroups)
            .with_standard_deviation(true)
            .aggregate()
            .unwrap();
        let stdev = tables
            .mean_variance
            .float_column("Stdev hole charge sg 1")
            .unwrap();
        assert!((stdev[0] - 0.1).abs() < 1e-12);
        assert_eq!(tables.mean_variance.columns().len(), 2 + 2 * 6);
    }

    #[test]
    fn test_mean_locality_per_cluster() {
        let subgroups = two_subgroups();
        let tables = ClusterAggregation::new(&[1, 2, 1, 2], &[0, 1, 2, 3], &subgroups)
            .with_locality(&[0.5, 0.9, 0.7, 0.3])
            .aggregate()
            .unwrap();
        let locality = tables.locality.unwrap();
        let mean = locality.float_column("Mean measure of locality").unwrap();
        assert!((mean[0] - 0.6).abs() < 1e-12);
        assert!((mean[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_index_ids_select_rows() {
        // Row ids need not be 0..n; they address the charge series directly
        let subgroups = two_subgroups();
        let summaries = ClusterAggregation::new(&[9, 9], &[3, 0], &subgroups)
            .summarize()
            .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].subgroups[0].hole.min, 0.1);
        assert_eq!(summaries[0].subgroups[0].hole.max, 0.2);
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let subgroups = two_subgroups();
        let err = ClusterAggregation::new(&[1], &[4], &subgroups)
            .aggregate()
            .unwrap_err();
        assert!(matches!(err, ChargeError::InvalidInput { .. }));

        let err = ClusterAggregation::new(&[1, 1], &[0, 3], &subgroups)
            .with_locality(&[0.1, 0.2])
            .aggregate()
            .unwrap_err();
        assert!(matches!(err, ChargeError::InvalidInput { .. }));
    }

    #[test]
    fn test_no_subgroups_fails() {
        let err = ClusterAggregation::new(&[1], &[0], &[])
            .aggregate()
            .unwrap_err();
        assert!(matches!(err, ChargeError::InvalidInput { .. }));
    }
}
