//! File-level entry points behind the binary's subcommands.
//!
//! Each command loads its JSON inputs, runs one pipeline stage and writes every
//! resulting table to `out_dir` as `<stem>.json`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::{FeatureOptions, RegionCharges, select_features};
use crate::config::{OUTPUT, table_filename};
use crate::data::{EnsembleFrame, load_from_path, load_subgroups, save_to_path};
use crate::domain::{LabelVolume, ScalarVolume};
use crate::models::DataTable;

use super::core::{EnsembleReport, TransitionPipeline, region_charges};

fn write_table<T: serde::Serialize>(table: &T, out_dir: &Path, stem: &str) -> Result<()> {
    let path = out_dir.join(table_filename(stem));
    save_to_path(table, &path)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

pub fn load_frame(path: &Path) -> Result<EnsembleFrame> {
    let frame: EnsembleFrame = load_from_path(path)?;
    frame
        .validate()
        .with_context(|| format!("Malformed ensemble frame: {}", path.display()))?;
    log::info!(
        "Loaded ensemble with {} members and {} columns from {}",
        frame.rows(),
        frame.columns.len(),
        path.display()
    );
    Ok(frame)
}

/// Transfer, locality and cluster tables for an ensemble file
pub fn run_ensemble(
    frame_path: &Path,
    nr_subgroups: usize,
    include_standard_deviation: bool,
    out_dir: &Path,
) -> Result<EnsembleReport> {
    let frame = load_frame(frame_path)?;
    let pipeline =
        TransitionPipeline::new(nr_subgroups)?.with_standard_deviation(include_standard_deviation);
    let report = pipeline.run(frame)?;

    write_table(&report.frame, out_dir, OUTPUT.ensemble_transfer)?;
    write_table(&report.locality, out_dir, OUTPUT.locality)?;
    if let Some(clusters) = &report.clusters {
        write_table(&clusters.stats, out_dir, OUTPUT.cluster_stats)?;
        write_table(&clusters.diff, out_dir, OUTPUT.cluster_diff)?;
        write_table(&clusters.mean_variance, out_dir, OUTPUT.cluster_mean_variance)?;
        if let Some(locality) = &clusters.locality {
            write_table(locality, out_dir, OUTPUT.cluster_locality)?;
        }
    }
    if let Some(mean_transfer) = &report.cluster_mean_transfer {
        write_table(mean_transfer, out_dir, OUTPUT.cluster_mean_transfer)?;
    }
    Ok(report)
}

/// Region and subgroup charge tables for one density volume
pub fn run_regions(
    values_path: &Path,
    labels_path: &Path,
    subgroups_path: &Path,
    out_dir: &Path,
) -> Result<RegionCharges> {
    let values: ScalarVolume = load_from_path(values_path)?;
    let labels: LabelVolume = load_from_path(labels_path)?;
    let subgroups = load_subgroups(subgroups_path)?;

    let charges = region_charges(&values, &labels, &subgroups)?;
    write_table(&charges.region_table()?, out_dir, OUTPUT.region_charge)?;
    write_table(&charges.subgroup_table()?, out_dir, OUTPUT.subgroup_charge)?;
    Ok(charges)
}

/// Feature-vector table for an ensemble file
pub fn run_features(
    frame_path: &Path,
    options: &FeatureOptions,
    out_dir: &Path,
) -> Result<DataTable> {
    let frame = load_frame(frame_path)?;
    let table = select_features(&frame.named_columns(), frame.rows(), options)
        .with_context(|| format!("Feature selection '{}' failed", options.selection))?;
    write_table(&table, out_dir, OUTPUT.features)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FeatureSelection;
    use crate::domain::SubgroupDefinition;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("charge_transitions_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_frame(dir: &Path) -> PathBuf {
        let mut frame = EnsembleFrame::new();
        frame.set_column("Cluster", vec![0.0, 0.0, 1.0]).unwrap();
        frame.set_column("Hole sg1", vec![0.5, 0.7, 0.3]).unwrap();
        frame.set_column("Hole sg2", vec![0.5, 0.3, 0.7]).unwrap();
        frame.set_column("Particle sg1", vec![1.0, 0.3, 0.6]).unwrap();
        frame.set_column("Particle sg2", vec![0.0, 0.7, 0.4]).unwrap();
        let path = dir.join("frame.json");
        save_to_path(&frame, &path).unwrap();
        path
    }

    #[test]
    fn test_run_ensemble_writes_tables() {
        let dir = scratch_dir("ensemble");
        let frame_path = write_frame(&dir);
        let out = dir.join("out");

        let report = run_ensemble(&frame_path, 2, true, &out).unwrap();
        assert_eq!(report.locality.len(), 3);
        for stem in [
            OUTPUT.ensemble_transfer,
            OUTPUT.locality,
            OUTPUT.cluster_stats,
            OUTPUT.cluster_diff,
            OUTPUT.cluster_mean_variance,
            OUTPUT.cluster_locality,
            OUTPUT.cluster_mean_transfer,
        ] {
            assert!(out.join(table_filename(stem)).exists(), "missing {}", stem);
        }

        let written: EnsembleFrame =
            load_from_path(&out.join(table_filename(OUTPUT.ensemble_transfer))).unwrap();
        assert!(written.has_column("Charge transfer 21"));
        assert!(written.has_column("Measure of locality"));

        let mean_variance: DataTable =
            load_from_path(&out.join(table_filename(OUTPUT.cluster_mean_variance))).unwrap();
        assert!(mean_variance.column("Stdev hole charge sg 2").is_some());
    }

    #[test]
    fn test_run_ensemble_rejects_too_many_subgroups() {
        let dir = scratch_dir("ensemble_bounds");
        let frame_path = write_frame(&dir);
        assert!(run_ensemble(&frame_path, 11, false, &dir.join("out")).is_err());
    }

    #[test]
    fn test_run_regions() {
        let dir = scratch_dir("regions");
        let values = ScalarVolume::new([2, 2, 1], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let labels = LabelVolume::new([2, 2, 1], vec![0, 1, 1, 2], [0, 3]).unwrap();
        let subgroups = vec![
            SubgroupDefinition::new("a", vec![0, 1]),
            SubgroupDefinition::new("b", vec![2]),
        ];
        save_to_path(&values, &dir.join("values.json")).unwrap();
        save_to_path(&labels, &dir.join("labels.json")).unwrap();
        save_to_path(&subgroups, &dir.join("subgroups.json")).unwrap();

        let out = dir.join("out");
        let charges = run_regions(
            &dir.join("values.json"),
            &dir.join("labels.json"),
            &dir.join("subgroups.json"),
            &out,
        )
        .unwrap();
        assert_eq!(charges.subgroup_charge_vector(), vec![60.0, 40.0]);
        assert!(out.join(table_filename(OUTPUT.region_charge)).exists());
        assert!(out.join(table_filename(OUTPUT.subgroup_charge)).exists());
    }

    #[test]
    fn test_run_features() {
        let dir = scratch_dir("features");
        let frame_path = write_frame(&dir);
        let options = FeatureOptions {
            selection: FeatureSelection::HoleAndParticle,
            name: "F".to_string(),
            ..Default::default()
        };
        let table = run_features(&frame_path, &options, &dir.join("out")).unwrap();
        assert_eq!(table.headers(), vec!["F1", "F2", "F3", "F4"]);
    }
}
