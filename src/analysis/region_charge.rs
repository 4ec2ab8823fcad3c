//! Charge per segmented region, folded into caller-defined subgroups.
//!
//! Every voxel's scalar value is accumulated under its region label. Region sums
//! are turned into percentages of the total charge and summed per subgroup,
//! giving the per-subgroup charge vector the transfer heuristic consumes.

use std::collections::{BTreeMap, HashSet};

#[allow(unused_imports)]
use crate::config::DEBUG_FLAGS;
use crate::config::COLUMNS;
use crate::domain::subgroup::total_region_count;
use crate::domain::{IndexMapper3D, LabelVolume, ScalarVolume, SubgroupDefinition};
use crate::error::{ChargeError, ChargeResult};
use crate::models::{ColumnData, DataTable};

#[derive(Debug, Clone, PartialEq)]
pub struct RegionCharge {
    pub label: u32,
    pub charge: f64,
    /// `100 * charge / total`
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubgroupCharge {
    pub name: String,
    /// Sum of the percentages of the subgroup's regions
    pub charge: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionCharges {
    /// Ordered by label
    pub regions: Vec<RegionCharge>,
    /// In definition order
    pub subgroups: Vec<SubgroupCharge>,
    pub total_charge: f64,
    /// Voxels whose label lies outside the declared range
    pub skipped_voxels: usize,
}

impl RegionCharges {
    /// Per-subgroup charges in definition order
    pub fn subgroup_charge_vector(&self) -> Vec<f64> {
        self.subgroups.iter().map(|s| s.charge).collect()
    }

    /// "Segmented region", "Charge", "Charge [%]"
    pub fn region_table(&self) -> ChargeResult<DataTable> {
        let mut table = DataTable::new(self.regions.len());
        table.add_column(
            COLUMNS.segmented_region,
            ColumnData::Int(self.regions.iter().map(|r| i64::from(r.label)).collect()),
        )?;
        table.add_float_column(
            COLUMNS.region_charge,
            self.regions.iter().map(|r| r.charge).collect(),
        )?;
        table.add_float_column(
            COLUMNS.region_charge_pct,
            self.regions.iter().map(|r| r.percentage).collect(),
        )?;
        Ok(table)
    }

    /// "subgroup", "charge_sg"
    pub fn subgroup_table(&self) -> ChargeResult<DataTable> {
        let mut table = DataTable::new(self.subgroups.len());
        table.add_column(
            COLUMNS.subgroup,
            ColumnData::Category(self.subgroups.iter().map(|s| s.name.clone()).collect()),
        )?;
        table.add_float_column(COLUMNS.subgroup_charge, self.subgroup_charge_vector())?;
        Ok(table)
    }
}

/// Sums `values` per label of `labels`, over the declared label range.
///
/// Returns the sums (every candidate label present, possibly zero) and the
/// number of voxels skipped because their label was outside the range.
pub fn sum_by_region(
    values: &ScalarVolume,
    labels: &LabelVolume,
) -> ChargeResult<(BTreeMap<u32, f64>, usize)> {
    if values.dims != labels.dims {
        return Err(ChargeError::invalid_input(format!(
            "dimension mismatch (values {:?}, labels {:?})",
            values.dims, labels.dims
        )));
    }
    values.validate()?;
    labels.validate()?;

    let mut sums: BTreeMap<u32, f64> = labels.candidate_labels().map(|l| (l, 0.0)).collect();
    if sums.is_empty() {
        return Err(ChargeError::invalid_input(format!(
            "no segmented regions (label range {:?})",
            labels.label_range
        )));
    }

    let im = IndexMapper3D::new(values.dims);
    let mut skipped = 0usize;
    im.for_each_voxel(|pos| {
        let idx = im.index(pos);
        match sums.get_mut(&labels.data[idx]) {
            Some(sum) => *sum += values.data[idx],
            None => skipped += 1,
        }
    });

    if skipped > 0 {
        log::warn!(
            "{} voxels carry labels outside the declared range {:?} and were skipped",
            skipped,
            labels.label_range
        );
    }
    Ok((sums, skipped))
}

fn check_subgroup_definitions(
    subgroups: &[SubgroupDefinition],
    region_labels: &BTreeMap<u32, f64>,
) -> ChargeResult<()> {
    let referenced = total_region_count(subgroups);
    if referenced != region_labels.len() {
        return Err(ChargeError::invalid_input(format!(
            "subgroup definition mismatch: subgroups reference {} regions, volume has {}",
            referenced,
            region_labels.len()
        )));
    }

    let mut seen: HashSet<u32> = HashSet::with_capacity(referenced);
    for subgroup in subgroups {
        for &label in &subgroup.indices {
            if !region_labels.contains_key(&label) {
                return Err(ChargeError::invalid_input(format!(
                    "subgroup definition mismatch: subgroup '{}' references unknown region {}",
                    subgroup.name, label
                )));
            }
            if !seen.insert(label) {
                return Err(ChargeError::invalid_input(format!(
                    "subgroup definition mismatch: region {} belongs to more than one subgroup",
                    label
                )));
            }
        }
    }
    Ok(())
}

/// Sums a scalar volume per region, then per subgroup.
///
/// # Errors
/// * `InvalidInput` on dimension mismatch, an empty label range, or a subgroup
///   partition that does not cover the regions exactly once.
/// * `ArithmeticDegenerate` when the total charge is zero.
pub fn sum_by_region_then_subgroup(
    values: &ScalarVolume,
    labels: &LabelVolume,
    subgroups: &[SubgroupDefinition],
) -> ChargeResult<RegionCharges> {
    let (sums, skipped_voxels) = sum_by_region(values, labels)?;
    check_subgroup_definitions(subgroups, &sums)?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_region_sums {
        log::debug!("Region sums: {:?}", sums);
    }

    let total_charge: f64 = sums.values().sum();
    if total_charge == 0.0 {
        return Err(ChargeError::degenerate("total charge over all regions is zero"));
    }

    let regions: Vec<RegionCharge> = sums
        .iter()
        .map(|(&label, &charge)| RegionCharge {
            label,
            charge,
            percentage: 100.0 * charge / total_charge,
        })
        .collect();

    let percentage_of: BTreeMap<u32, f64> =
        regions.iter().map(|r| (r.label, r.percentage)).collect();
    let subgroup_charges = subgroups
        .iter()
        .map(|sg| SubgroupCharge {
            name: sg.name.clone(),
            charge: sg.indices.iter().map(|l| percentage_of[l]).sum(),
        })
        .collect();

    Ok(RegionCharges {
        regions,
        subgroups: subgroup_charges,
        total_charge,
        skipped_voxels,
    })
}
