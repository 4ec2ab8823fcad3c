use std::fmt;

use serde::{Deserialize, Serialize};

/// The two charge series recorded for each subgroup of a transition
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, strum_macros::EnumIter,
)]
pub enum ChargeKind {
    Hole,     // Charge lost by the fragment
    Particle, // Charge gained by the fragment
}

impl fmt::Display for ChargeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChargeKind::Hole => write!(f, "hole"),
            ChargeKind::Particle => write!(f, "particle"),
        }
    }
}

/// Hole and particle charges of ONE subgroup across all ensemble members.
/// `hole[m]` and `particle[m]` belong to member row `m`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgroupCharges {
    pub hole: Vec<f64>,
    pub particle: Vec<f64>,
}

impl SubgroupCharges {
    pub fn new(hole: Vec<f64>, particle: Vec<f64>) -> Self {
        Self { hole, particle }
    }

    /// Number of members both series can serve
    pub fn members(&self) -> usize {
        self.hole.len().min(self.particle.len())
    }
}
