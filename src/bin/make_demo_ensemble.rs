use anyhow::{Context, Result};
use charge_transitions::data::{EnsembleFrame, save_to_path};
use charge_transitions::domain::{LabelVolume, ScalarVolume, SubgroupDefinition};
use std::path::PathBuf;

const DEMO_PATH: &str = "demo";
const DEMO_SUBGROUPS: usize = 3;

// Hole / particle charge per subgroup for a handful of transitions, two clusters
const DEMO_MEMBERS: [(i64, [f64; DEMO_SUBGROUPS], [f64; DEMO_SUBGROUPS]); 6] = [
    (0, [0.50, 0.20, 0.30], [0.10, 0.40, 0.50]),
    (0, [0.45, 0.25, 0.30], [0.15, 0.35, 0.50]),
    (0, [0.55, 0.15, 0.30], [0.05, 0.45, 0.50]),
    (1, [0.20, 0.30, 0.50], [0.30, 0.50, 0.20]),
    (1, [0.25, 0.25, 0.50], [0.35, 0.45, 0.20]),
    (1, [0.15, 0.35, 0.50], [0.25, 0.55, 0.20]),
];

fn main() -> Result<()> {
    let dir = PathBuf::from(DEMO_PATH);
    build_demo_ensemble(&dir)?;
    build_demo_volumes(&dir)?;
    Ok(())
}

fn build_demo_ensemble(dir: &std::path::Path) -> Result<()> {
    let mut frame = EnsembleFrame::new();
    frame.set_column("Cluster", DEMO_MEMBERS.iter().map(|m| m.0 as f64).collect())?;
    for sg in 0..DEMO_SUBGROUPS {
        frame.set_column(
            format!("Hole sg{}", sg + 1),
            DEMO_MEMBERS.iter().map(|m| m.1[sg]).collect(),
        )?;
        frame.set_column(
            format!("Particle sg{}", sg + 1),
            DEMO_MEMBERS.iter().map(|m| m.2[sg]).collect(),
        )?;
    }
    frame.set_column(
        "Energy",
        (0..DEMO_MEMBERS.len()).map(|i| 3.0 + 0.1 * i as f64).collect(),
    )?;

    let path = dir.join("ensemble.json");
    save_to_path(&frame, &path).with_context(|| format!("Failed to write {:?}", path))?;
    println!("✅ Demo ensemble written to {:?} with {} members.", path, frame.rows());
    Ok(())
}

// 4x2x1 grid with four regions, folded into two subgroups
fn build_demo_volumes(dir: &std::path::Path) -> Result<()> {
    let dims = [4, 2, 1];
    let hole = ScalarVolume::new(dims, vec![0.9, 0.8, 0.2, 0.1, 0.7, 0.6, 0.3, 0.2])?;
    let particle = ScalarVolume::new(dims, vec![0.1, 0.2, 0.6, 0.9, 0.2, 0.3, 0.8, 0.7])?;
    let labels = LabelVolume::new(dims, vec![0, 1, 2, 3, 0, 1, 2, 3], [0, 4])?;
    let subgroups = vec![
        SubgroupDefinition::new("left", vec![0, 1]),
        SubgroupDefinition::new("right", vec![2, 3]),
    ];

    save_to_path(&hole, &dir.join("hole_density.json"))?;
    save_to_path(&particle, &dir.join("particle_density.json"))?;
    save_to_path(&labels, &dir.join("labels.json"))?;
    save_to_path(&subgroups, &dir.join("subgroups.json"))?;
    println!("✅ Demo volumes written to {:?}.", dir);
    Ok(())
}
