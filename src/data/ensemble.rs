//! Named-column view of an ensemble of transitions.
//!
//! This is the adapter between tabular collaborators (JSON files, host data
//! frames) and the typed inputs of the analysis functions: every lookup by
//! column name happens here, never in `analysis`.

use serde::{Deserialize, Serialize};

use crate::config::COLUMNS;
use crate::domain::SubgroupCharges;
use crate::error::{ChargeError, ChargeResult};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrameColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Ensemble members as rows, features as named columns.
///
/// JSON shape: `{ "index": [..]?, "columns": [{ "name": "Hole sg1", "values": [..] }, ..] }`.
/// Without an explicit index the row ids are `0..rows`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EnsembleFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Vec<usize>>,
    #[serde(default)]
    pub columns: Vec<FrameColumn>,
}

impl EnsembleFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> usize {
        match (&self.index, self.columns.first()) {
            (Some(index), _) => index.len(),
            (None, Some(first)) => first.values.len(),
            (None, None) => 0,
        }
    }

    /// All columns (and the index, if any) must have the same length
    pub fn validate(&self) -> ChargeResult<()> {
        let rows = self.rows();
        for column in &self.columns {
            if column.values.len() != rows {
                return Err(ChargeError::invalid_input(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.values.len(),
                    rows
                )));
            }
        }
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Appends a column, or replaces one with the same name
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> ChargeResult<()> {
        let name = name.into();
        if !self.columns.is_empty() || self.index.is_some() {
            let rows = self.rows();
            if values.len() != rows {
                return Err(ChargeError::invalid_input(format!(
                    "column '{}' has {} values, frame has {} rows",
                    name,
                    values.len(),
                    rows
                )));
            }
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(FrameColumn { name, values }),
        }
        Ok(())
    }

    pub fn named_columns(&self) -> Vec<(&str, &[f64])> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.values.as_slice()))
            .collect()
    }

    /// Explicit row ids, or `0..rows`
    pub fn index_ids(&self) -> Vec<usize> {
        match &self.index {
            Some(index) => index.clone(),
            None => (0..self.rows()).collect(),
        }
    }

    /// The "Cluster" column, truncated to integers
    pub fn cluster_ids(&self) -> ChargeResult<Vec<i64>> {
        let values = self
            .column(COLUMNS.cluster)
            .ok_or_else(|| ChargeError::data_access("could not get the cluster column"))?;
        values
            .iter()
            .map(|&v| {
                if v.is_finite() {
                    Ok(v as i64)
                } else {
                    Err(ChargeError::invalid_input(format!("cluster id {} is not finite", v)))
                }
            })
            .collect()
    }

    /// "Hole sg{i}" / "Particle sg{i}" for `i = 1..=nr_subgroups`
    pub fn subgroup_charges(&self, nr_subgroups: usize) -> ChargeResult<Vec<SubgroupCharges>> {
        (1..=nr_subgroups)
            .map(|sg| {
                match (
                    self.column(&COLUMNS.hole(sg)),
                    self.column(&COLUMNS.particle(sg)),
                ) {
                    (Some(hole), Some(particle)) => {
                        Ok(SubgroupCharges::new(hole.to_vec(), particle.to_vec()))
                    }
                    _ => Err(ChargeError::data_access(format!(
                        "could not get hole or particle column, subgroup {}",
                        sg
                    ))),
                }
            })
            .collect()
    }

    /// "Charge transfer {i}{i}" for `i = 1..=nr_subgroups`
    pub fn transfer_diagonals(&self, nr_subgroups: usize) -> ChargeResult<Vec<&[f64]>> {
        (1..=nr_subgroups)
            .map(|sg| {
                self.column(&COLUMNS.charge_transfer(sg, sg)).ok_or_else(|| {
                    ChargeError::data_access(format!(
                        "could not get charge transfer matrix diagonal column, subgroup {}",
                        sg
                    ))
                })
            })
            .collect()
    }

    /// Hole and particle charge of every subgroup for one member row
    pub fn member_charges(
        subgroups: &[SubgroupCharges],
        row: usize,
    ) -> (Vec<f64>, Vec<f64>) {
        subgroups
            .iter()
            .map(|sg| (sg.hole[row], sg.particle[row]))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> EnsembleFrame {
        let mut frame = EnsembleFrame::new();
        frame.set_column("Cluster", vec![1.0, 2.0, 1.0]).unwrap();
        frame.set_column("Hole sg1", vec![0.5, 0.4, 0.3]).unwrap();
        frame.set_column("Particle sg1", vec![0.2, 0.6, 0.3]).unwrap();
        frame.set_column("Hole sg2", vec![0.5, 0.6, 0.7]).unwrap();
        frame.set_column("Particle sg2", vec![0.8, 0.4, 0.7]).unwrap();
        frame
    }

    #[test]
    fn test_rows_and_default_index() {
        let frame = frame();
        assert_eq!(frame.rows(), 3);
        assert_eq!(frame.index_ids(), vec![0, 1, 2]);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_set_column_checks_length_and_replaces() {
        let mut frame = frame();
        assert!(frame.set_column("x", vec![1.0]).is_err());
        frame.set_column("Cluster", vec![3.0, 3.0, 3.0]).unwrap();
        assert_eq!(frame.cluster_ids().unwrap(), vec![3, 3, 3]);
        assert_eq!(frame.columns.len(), 5);
    }

    #[test]
    fn test_subgroup_charges_resolve_by_name() {
        let frame = frame();
        let subgroups = frame.subgroup_charges(2).unwrap();
        assert_eq!(subgroups[1].particle, vec![0.8, 0.4, 0.7]);

        let (hole, particle) = EnsembleFrame::member_charges(&subgroups, 1);
        assert_eq!(hole, vec![0.4, 0.6]);
        assert_eq!(particle, vec![0.6, 0.4]);
    }

    #[test]
    fn test_missing_subgroup_names_subgroup() {
        let err = frame().subgroup_charges(3).unwrap_err();
        assert_eq!(
            err,
            ChargeError::data_access("could not get hole or particle column, subgroup 3")
        );
    }

    #[test]
    fn test_missing_diagonal_names_subgroup() {
        let mut frame = frame();
        frame.set_column("Charge transfer 11", vec![0.2, 0.4, 0.3]).unwrap();
        assert_eq!(frame.transfer_diagonals(1).unwrap().len(), 1);
        let err = frame.transfer_diagonals(2).unwrap_err();
        assert!(err.to_string().contains("subgroup 2"));
    }

    #[test]
    fn test_cluster_column_required() {
        let frame = EnsembleFrame::new();
        assert!(matches!(
            frame.cluster_ids(),
            Err(ChargeError::DataAccess { .. })
        ));
    }

    #[test]
    fn test_deserializes_from_json() {
        let json = r#"{ "columns": [ { "name": "Cluster", "values": [1, 1] } ] }"#;
        let frame: EnsembleFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.rows(), 2);
        assert!(frame.index.is_none());
    }
}
