//! Measure of locality: the charge every subgroup keeps for itself, summed.
//!
//! Input is one diagonal column per subgroup (the self-retention term of that
//! subgroup's transfer matrix for every ensemble member). Higher values mean
//! the excitation stayed more local.

use crate::error::{ChargeError, ChargeResult};
use crate::utils::maths_utils::add_assign_elementwise;

/// `locality[m] = Σ_s diagonals[s][m]`
pub fn compute_locality<D: AsRef<[f64]>>(diagonals: &[D]) -> ChargeResult<Vec<f64>> {
    let Some(first) = diagonals.first() else {
        return Err(ChargeError::invalid_input("no diagonal columns"));
    };
    let members = first.as_ref().len();

    let mut locality = vec![0.0; members];
    for (sg, diagonal) in diagonals.iter().enumerate() {
        let diagonal = diagonal.as_ref();
        if diagonal.len() != members {
            return Err(ChargeError::invalid_input(format!(
                "diagonal column of subgroup {} has {} values, expected {}",
                sg + 1,
                diagonal.len(),
                members
            )));
        }
        add_assign_elementwise(&mut locality, diagonal);
    }
    Ok(locality)
}
