use anyhow::{Context, Result, bail};

use crate::analysis::{
    ClusterAggregation, ClusterTables, RegionCharges, compute_locality,
    compute_transfer_and_difference, sum_by_region_then_subgroup,
};
use crate::config::{ANALYSIS, COLUMNS};
use crate::data::EnsembleFrame;
use crate::domain::{LabelVolume, ScalarVolume, SubgroupDefinition};
use crate::error::ChargeResult;
use crate::models::{ColumnData, DataTable};

/// Tables for a single transition: ("Charge difference", transfer columns "1".."n")
pub fn transition_tables(hole: &[f64], particle: &[f64]) -> ChargeResult<(DataTable, DataTable)> {
    let (transfer, diff) = compute_transfer_and_difference(hole, particle)?;
    let n = diff.len();

    let mut diff_table = DataTable::new(n);
    diff_table.add_float_column(COLUMNS.charge_difference, diff)?;

    let mut transfer_table = DataTable::new(n);
    for (i, column) in transfer.into_columns().into_iter().enumerate() {
        transfer_table.add_float_column(COLUMNS.transfer_column(i + 1), column)?;
    }
    Ok((diff_table, transfer_table))
}

/// Volume stage: charge per region and per subgroup for one density volume
pub fn region_charges(
    values: &ScalarVolume,
    labels: &LabelVolume,
    subgroups: &[SubgroupDefinition],
) -> Result<RegionCharges> {
    let charges = sum_by_region_then_subgroup(values, labels, subgroups)
        .context("Failed to sum charge in segmented regions")?;
    log::info!(
        "Summed {} regions into {} subgroups (total charge {:.6})",
        charges.regions.len(),
        charges.subgroups.len(),
        charges.total_charge
    );
    Ok(charges)
}

/// Everything the ensemble pipeline produces
#[derive(Debug, Clone)]
pub struct EnsembleReport {
    /// Input frame plus "Delta q sg{i}", "Charge transfer {i}{j}" and
    /// "Measure of locality" columns
    pub frame: EnsembleFrame,
    pub locality: Vec<f64>,
    /// `None` when the frame has no "Cluster" column
    pub clusters: Option<ClusterTables>,
    /// Transfer matrix of every cluster's mean charges; NaN rows for clusters
    /// whose means have no donor or no acceptor
    pub cluster_mean_transfer: Option<DataTable>,
}

/// Runs the analysis stages over an ensemble in order:
/// transfer per member -> locality -> cluster statistics -> cluster mean transfer.
#[derive(Debug, Clone)]
pub struct TransitionPipeline {
    nr_subgroups: usize,
    include_standard_deviation: bool,
}

impl TransitionPipeline {
    pub fn new(nr_subgroups: usize) -> Result<Self> {
        ANALYSIS.validate_subgroup_count(nr_subgroups)?;
        Ok(Self {
            nr_subgroups,
            include_standard_deviation: ANALYSIS.cluster.include_standard_deviation,
        })
    }

    pub fn with_standard_deviation(mut self, include: bool) -> Self {
        self.include_standard_deviation = include;
        self
    }

    /// Adds "Delta q sg{i}" and "Charge transfer {i}{j}" (conceptual row i,
    /// column j) for every member row.
    pub fn ensemble_transfer(&self, frame: &mut EnsembleFrame) -> Result<()> {
        frame.validate()?;
        let n = self.nr_subgroups;
        let rows = frame.rows();
        let subgroups = frame.subgroup_charges(n)?;

        let mut delta_q = vec![Vec::with_capacity(rows); n];
        let mut entries = vec![vec![Vec::with_capacity(rows); n]; n];
        for row in 0..rows {
            let (hole, particle) = EnsembleFrame::member_charges(&subgroups, row);
            let (transfer, diff) = compute_transfer_and_difference(&hole, &particle)
                .with_context(|| format!("Charge transfer failed for member row {}", row))?;

            for i in 0..n {
                delta_q[i].push(diff[i]);
                for (j, entries_ij) in entries[i].iter_mut().enumerate() {
                    entries_ij.push(transfer.entry(i, j));
                }
            }
        }

        for (i, values) in delta_q.into_iter().enumerate() {
            frame.set_column(COLUMNS.delta_q(i + 1), values)?;
        }
        for (i, row_entries) in entries.into_iter().enumerate() {
            for (j, values) in row_entries.into_iter().enumerate() {
                frame.set_column(COLUMNS.charge_transfer(i + 1, j + 1), values)?;
            }
        }

        log::info!(
            "Computed charge transfer for {} members over {} subgroups",
            rows,
            n
        );
        Ok(())
    }

    /// Sums the "Charge transfer {i}{i}" columns and stores "Measure of locality"
    pub fn locality(&self, frame: &mut EnsembleFrame) -> Result<Vec<f64>> {
        let diagonals = frame.transfer_diagonals(self.nr_subgroups)?;
        let locality = compute_locality(&diagonals)?;
        frame.set_column(COLUMNS.measure_of_locality, locality.clone())?;
        Ok(locality)
    }

    /// Cluster statistics; locality is included when the frame carries it
    pub fn cluster_statistics(&self, frame: &EnsembleFrame) -> Result<ClusterTables> {
        let cluster_ids = frame.cluster_ids()?;
        let index_ids = frame.index_ids();
        let subgroups = frame.subgroup_charges(self.nr_subgroups)?;

        let mut aggregation = ClusterAggregation::new(&cluster_ids, &index_ids, &subgroups)
            .with_standard_deviation(self.include_standard_deviation);
        if let Some(locality) = frame.column(COLUMNS.measure_of_locality) {
            aggregation = aggregation.with_locality(locality);
        }
        let tables = aggregation
            .aggregate()
            .context("Failed to aggregate cluster statistics")?;
        Ok(tables)
    }

    /// Transfer matrix of each cluster's mean hole/particle charges.
    ///
    /// Reads "Mean hole charge sg {i}" / "Mean particle charge sg {i}" from the
    /// mean/variance table and writes "Cluster" plus "Charge transfer {i}{j}".
    /// A cluster whose mean charges admit no transfer gets a NaN row and a warning.
    pub fn cluster_mean_transfer(&self, mean_variance: &DataTable) -> Result<DataTable> {
        let n = self.nr_subgroups;
        let rows = mean_variance.rows();

        let mut mean_hole = Vec::with_capacity(n);
        let mut mean_particle = Vec::with_capacity(n);
        for sg in 1..=n {
            mean_hole.push(mean_variance.float_column(&COLUMNS.statistic("Mean", "hole", sg))?);
            mean_particle
                .push(mean_variance.float_column(&COLUMNS.statistic("Mean", "particle", sg))?);
        }
        let cluster_ids = match mean_variance.column(COLUMNS.cluster) {
            Some(ColumnData::Int(ids)) => ids.clone(),
            _ => bail!("Mean table has no integer '{}' column", COLUMNS.cluster),
        };

        let mut entries = vec![vec![Vec::with_capacity(rows); n]; n];
        for (row, cluster_id) in cluster_ids.iter().enumerate() {
            let hole: Vec<f64> = mean_hole.iter().map(|c| c[row]).collect();
            let particle: Vec<f64> = mean_particle.iter().map(|c| c[row]).collect();
            let transfer = match compute_transfer_and_difference(&hole, &particle) {
                Ok((transfer, _)) => Some(transfer),
                Err(e) => {
                    log::warn!("No mean charge transfer for cluster {}: {}", cluster_id, e);
                    None
                }
            };
            for (i, row_entries) in entries.iter_mut().enumerate() {
                for (j, values) in row_entries.iter_mut().enumerate() {
                    values.push(transfer.as_ref().map_or(f64::NAN, |t| t.entry(i, j)));
                }
            }
        }

        let mut table = DataTable::new(rows);
        table.add_column(COLUMNS.cluster, ColumnData::Int(cluster_ids))?;
        for (i, row_entries) in entries.into_iter().enumerate() {
            for (j, values) in row_entries.into_iter().enumerate() {
                table.add_float_column(COLUMNS.charge_transfer(i + 1, j + 1), values)?;
            }
        }
        Ok(table)
    }

    /// All ensemble stages in sequence
    pub fn run(&self, mut frame: EnsembleFrame) -> Result<EnsembleReport> {
        self.ensemble_transfer(&mut frame)?;
        let locality = self.locality(&mut frame)?;

        let (clusters, cluster_mean_transfer) = if frame.has_column(COLUMNS.cluster) {
            let tables = self.cluster_statistics(&frame)?;
            let mean_transfer = self.cluster_mean_transfer(&tables.mean_variance)?;
            (Some(tables), Some(mean_transfer))
        } else {
            log::warn!(
                "No '{}' column in the ensemble; skipping cluster statistics",
                COLUMNS.cluster
            );
            (None, None)
        };

        Ok(EnsembleReport {
            frame,
            locality,
            clusters,
            cluster_mean_transfer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two subgroups, three members in clusters 1, 1, 2
    fn ensemble() -> EnsembleFrame {
        let mut frame = EnsembleFrame::new();
        frame.set_column("Cluster", vec![1.0, 1.0, 2.0]).unwrap();
        frame.set_column("Hole sg1", vec![0.5, 0.6, 0.2]).unwrap();
        frame.set_column("Hole sg2", vec![0.5, 0.4, 0.8]).unwrap();
        frame.set_column("Particle sg1", vec![1.0, 0.8, 0.1]).unwrap();
        frame.set_column("Particle sg2", vec![0.0, 0.2, 0.9]).unwrap();
        frame
    }

    #[test]
    fn test_transition_tables() {
        let (diff, transfer) = transition_tables(&[0.5, 0.2, 0.3], &[0.1, 0.4, 0.5]).unwrap();
        assert_eq!(diff.headers(), vec!["Charge difference"]);
        assert_eq!(transfer.headers(), vec!["1", "2", "3"]);
        let first = transfer.float_column("1").unwrap();
        assert!((first[1] - 0.2).abs() < 1e-12);
        assert!((first[2] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_pipeline_rejects_bad_subgroup_count() {
        assert!(TransitionPipeline::new(0).is_err());
        assert!(TransitionPipeline::new(11).is_err());
    }

    #[test]
    fn test_ensemble_transfer_columns() {
        let pipeline = TransitionPipeline::new(2).unwrap();
        let mut frame = ensemble();
        pipeline.ensemble_transfer(&mut frame).unwrap();

        // Member 0: hole [0.5, 0.5], particle [1.0, 0.0]; subgroup 2 gives 0.5 to subgroup 1
        assert_eq!(frame.column("Delta q sg1").unwrap()[0], 0.5);
        assert_eq!(frame.column("Delta q sg2").unwrap()[0], -0.5);
        assert_eq!(frame.column("Charge transfer 11").unwrap()[0], 0.5);
        assert_eq!(frame.column("Charge transfer 12").unwrap()[0], 0.5);
        assert_eq!(frame.column("Charge transfer 21").unwrap()[0], 0.0);
        assert_eq!(frame.column("Charge transfer 22").unwrap()[0], 0.0);
    }

    #[test]
    fn test_ensemble_transfer_names_failing_member() {
        let pipeline = TransitionPipeline::new(2).unwrap();
        let mut frame = ensemble();
        // Member 1 becomes all-acceptor
        frame.set_column("Particle sg2", vec![0.0, 0.4, 0.9]).unwrap();
        let err = pipeline.ensemble_transfer(&mut frame).unwrap_err();
        assert!(format!("{:#}", err).contains("member row 1"));
    }

    #[test]
    fn test_full_run() {
        let pipeline = TransitionPipeline::new(2).unwrap();
        let report = pipeline.run(ensemble()).unwrap();

        assert_eq!(report.locality.len(), 3);
        // Member 0 keeps 0.5 + 0.0
        assert!((report.locality[0] - 0.5).abs() < 1e-12);
        assert!(report.frame.has_column("Measure of locality"));

        let clusters = report.clusters.unwrap();
        assert_eq!(clusters.stats.rows(), 2);
        let locality = clusters.locality.unwrap();
        let mean = locality.float_column("Mean measure of locality").unwrap();
        assert!((mean[1] - report.locality[2]).abs() < 1e-12);

        let mean_transfer = report.cluster_mean_transfer.unwrap();
        assert_eq!(mean_transfer.rows(), 2);
        assert_eq!(mean_transfer.columns().len(), 1 + 4);
    }

    #[test]
    fn test_degenerate_cluster_mean_keeps_core_output() {
        // Each member has a donor, but the cluster means gain charge everywhere
        let mut frame = EnsembleFrame::new();
        frame.set_column("Cluster", vec![1.0, 1.0, 2.0]).unwrap();
        frame.set_column("Hole sg1", vec![0.5, 0.5, 0.5]).unwrap();
        frame.set_column("Hole sg2", vec![0.5, 0.5, 0.5]).unwrap();
        frame.set_column("Particle sg1", vec![0.4, 0.8, 1.0]).unwrap();
        frame.set_column("Particle sg2", vec![0.8, 0.4, 0.0]).unwrap();

        let pipeline = TransitionPipeline::new(2).unwrap();
        let report = pipeline.run(frame).unwrap();
        assert_eq!(report.locality.len(), 3);
        assert!(report.clusters.is_some());

        let mean_transfer = report.cluster_mean_transfer.unwrap();
        assert_eq!(mean_transfer.rows(), 2);
        let entry_11 = mean_transfer.float_column("Charge transfer 11").unwrap();
        assert!(entry_11[0].is_nan());
        assert!((entry_11[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_run_without_cluster_column() {
        let pipeline = TransitionPipeline::new(2).unwrap();
        let mut frame = EnsembleFrame::new();
        for (name, values) in ensemble().columns.into_iter().map(|c| (c.name, c.values)) {
            if name != "Cluster" {
                frame.set_column(name, values).unwrap();
            }
        }
        let report = pipeline.run(frame).unwrap();
        assert!(report.clusters.is_none());
        assert!(report.cluster_mean_transfer.is_none());
    }

    #[test]
    fn test_region_charges_feed_transfer() {
        let hole_values = ScalarVolume::new([2, 1, 1], vec![3.0, 1.0]).unwrap();
        let particle_values = ScalarVolume::new([2, 1, 1], vec![1.0, 3.0]).unwrap();
        let labels = LabelVolume::new([2, 1, 1], vec![0, 1], [0, 2]).unwrap();
        let subgroups = vec![
            SubgroupDefinition::new("left", vec![0]),
            SubgroupDefinition::new("right", vec![1]),
        ];

        let hole = region_charges(&hole_values, &labels, &subgroups).unwrap();
        let particle = region_charges(&particle_values, &labels, &subgroups).unwrap();
        let (diff, transfer) = transition_tables(
            &hole.subgroup_charge_vector(),
            &particle.subgroup_charge_vector(),
        )
        .unwrap();

        assert_eq!(diff.float_column("Charge difference").unwrap(), &[-50.0, 50.0]);
        assert_eq!(transfer.float_column("1").unwrap(), &[25.0, 50.0]);
    }
}
