//! Feature vector selection over an ensemble table.
//!
//! Picks columns by (lower-cased) header: hole/particle charges, the full
//! transfer matrix, its diagonal ("trace" entries such as "Charge transfer 33"),
//! or a plain index range. Optional extras append oscillator strength,
//! rotatory strength, energy and trace columns. Selected columns are renamed
//! `{name}1`, `{name}2`, ...

use serde::{Deserialize, Serialize};

use crate::config::ANALYSIS;
#[allow(unused_imports)]
use crate::config::DEBUG_FLAGS;
use crate::error::{ChargeError, ChargeResult};
use crate::models::DataTable;

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum FeatureSelection {
    #[default]
    HoleAndParticle, // "hole" or "particle" columns
    ChargeTransferMatrix, // every "transfer" column
    Trace,                // diagonal transfer columns only
    Bottleneck,           // "h0" / "h2" columns
    ColumnRange,          // inclusive index range
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureOptions {
    pub selection: FeatureSelection,
    /// Inclusive, only used by `ColumnRange`
    pub column_range: (usize, usize),
    pub use_osc_strength: bool,
    pub use_rot_strength: bool,
    pub use_energy: bool,
    pub use_trace: bool,
    pub name: String,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            selection: FeatureSelection::default(),
            column_range: (0, 10),
            use_osc_strength: false,
            use_rot_strength: false,
            use_energy: false,
            use_trace: false,
            name: ANALYSIS.features.default_name.to_string(),
        }
    }
}

fn is_trace_header(header: &str) -> bool {
    let bytes = header.as_bytes();
    header.contains("transfer") && bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[bytes.len() - 2]
}

impl FeatureOptions {
    fn main_selection_matches(&self, index: usize, header: &str) -> bool {
        match self.selection {
            FeatureSelection::HoleAndParticle => {
                header.contains("hole") || header.contains("particle")
            }
            FeatureSelection::ChargeTransferMatrix => header.contains("transfer"),
            FeatureSelection::Trace => is_trace_header(header),
            FeatureSelection::Bottleneck => header.contains("h0") || header.contains("h2"),
            FeatureSelection::ColumnRange => {
                index >= self.column_range.0 && index <= self.column_range.1
            }
        }
    }

    /// How many times column `index` lands in the feature vector (0, 1 or more)
    fn multiplicity(&self, index: usize, header: &str) -> usize {
        let header = header.to_lowercase();
        [
            self.main_selection_matches(index, &header),
            self.use_osc_strength && header.contains("osc"),
            self.use_rot_strength && header.contains("rot"),
            self.use_energy && header.contains("energy"),
            self.use_trace && is_trace_header(&header),
        ]
        .iter()
        .filter(|&&hit| hit)
        .count()
    }
}

/// Builds the feature-vector table from named columns of `rows` values each.
pub fn select_features(
    columns: &[(&str, &[f64])],
    rows: usize,
    options: &FeatureOptions,
) -> ChargeResult<DataTable> {
    if options.selection == FeatureSelection::ColumnRange
        && (options.column_range.0 > options.column_range.1
            || options.column_range.1 > ANALYSIS.features.max_column_index)
    {
        return Err(ChargeError::invalid_input(format!(
            "invalid column range {:?}",
            options.column_range
        )));
    }

    let mut picked: Vec<(&str, &[f64])> = Vec::new();
    for (index, &(header, values)) in columns.iter().enumerate() {
        if values.len() != rows {
            return Err(ChargeError::dimension_mismatch(rows, values.len()));
        }
        for _ in 0..options.multiplicity(index, header) {
            picked.push((header, values));
        }
    }

    if picked.is_empty() {
        return Err(ChargeError::invalid_input(format!(
            "no columns match feature selection '{}'",
            options.selection
        )));
    }

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_feature_headers {
        let headers: Vec<&str> = picked.iter().map(|(h, _)| *h).collect();
        log::debug!("Feature vector columns: {:?}", headers);
    }
    log::info!("Length of feature vector: {}", picked.len());

    let mut table = DataTable::new(rows);
    for (k, (_, values)) in picked.into_iter().enumerate() {
        table.add_float_column(format!("{}{}", options.name, k + 1), values.to_vec())?;
    }
    Ok(table)
}
