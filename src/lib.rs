#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod utils;

// Orchestration over the analysis stages
pub mod engine;

// Re-export commonly used types
pub use analysis::{FeatureOptions, FeatureSelection, compute_transfer_and_difference};
pub use data::EnsembleFrame;
pub use domain::{SubgroupCharges, SubgroupDefinition, TransferMatrix};
pub use engine::TransitionPipeline;
pub use error::{ChargeError, ChargeResult};
pub use models::DataTable;

use std::path::PathBuf;

// CLI argument parsing
use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory the output tables are written to
    #[arg(long, global = true, default_value = "output")]
    pub out: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Charge transfer, locality and cluster statistics over an ensemble
    Ensemble {
        /// Ensemble frame (JSON)
        frame: PathBuf,
        #[arg(long, default_value_t = config::ANALYSIS.subgroups.default)]
        subgroups: usize,
        /// Add standard deviation columns to the mean/variance table
        #[arg(long, default_value_t = false)]
        stdev: bool,
    },
    /// Charge per segmented region and per subgroup of one volume
    Regions {
        #[arg(long)]
        values: PathBuf,
        #[arg(long)]
        labels: PathBuf,
        /// Subgroup definitions (JSON array of { name, indices })
        #[arg(long)]
        subgroups: PathBuf,
    },
    /// Feature vector selection over an ensemble
    Features {
        frame: PathBuf,
        #[arg(long, default_value_t = FeatureSelection::default())]
        selection: FeatureSelection,
        /// Inclusive column index range, used by `column_range`
        #[arg(long, num_args = 2, value_names = ["FIRST", "LAST"])]
        range: Option<Vec<usize>>,
        #[arg(long)]
        osc: bool,
        #[arg(long)]
        rot: bool,
        #[arg(long)]
        energy: bool,
        #[arg(long)]
        trace: bool,
        #[arg(long, default_value = config::ANALYSIS.features.default_name)]
        name: String,
    },
}

impl Command {
    fn feature_options(&self) -> Option<FeatureOptions> {
        let Command::Features {
            selection,
            range,
            osc,
            rot,
            energy,
            trace,
            name,
            ..
        } = self
        else {
            return None;
        };
        let mut options = FeatureOptions {
            selection: *selection,
            use_osc_strength: *osc,
            use_rot_strength: *rot,
            use_energy: *energy,
            use_trace: *trace,
            name: name.clone(),
            ..Default::default()
        };
        if let Some([first, last]) = range.as_deref() {
            options.column_range = (*first, *last);
        }
        Some(options)
    }
}

/// Runs one subcommand. This is the public API for the binary to call
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Ensemble {
            frame,
            subgroups,
            stdev,
        } => {
            let report = engine::run_ensemble(frame, *subgroups, *stdev, &cli.out)?;
            log::info!(
                "Ensemble done: {} members, {} clusters",
                report.frame.rows(),
                report.clusters.as_ref().map_or(0, |c| c.stats.rows())
            );
        }
        Command::Regions {
            values,
            labels,
            subgroups,
        } => {
            let charges = engine::run_regions(values, labels, subgroups, &cli.out)?;
            log::info!(
                "Regions done: {} regions, {} skipped voxels",
                charges.regions.len(),
                charges.skipped_voxels
            );
        }
        Command::Features { frame, .. } => {
            let options = cli
                .command
                .feature_options()
                .ok_or_else(|| anyhow::anyhow!("not a feature command"))?;
            engine::run_features(frame, &options, &cli.out)?;
        }
    }
    Ok(())
}
