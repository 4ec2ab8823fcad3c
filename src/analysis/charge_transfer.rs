//! Donor/acceptor charge-transfer heuristic.
//!
//! Every subgroup whose particle charge is below its hole charge is a donor;
//! every other subgroup (including an unchanged one) is an acceptor. Each donor's
//! lost charge is apportioned over the acceptors, weighted by each acceptor's
//! share of the total gained charge. What a subgroup keeps for itself,
//! `min(hole, particle)`, goes on the diagonal.

use itertools::iproduct;

#[allow(unused_imports)]
use crate::config::DEBUG_FLAGS;
use crate::domain::TransferMatrix;
use crate::error::{ChargeError, ChargeResult};

/// Donor / acceptor split of the subgroup indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorAcceptorSplit {
    pub donors: Vec<usize>,
    pub acceptors: Vec<usize>,
}

/// `particle[i] - hole[i]` for every subgroup. Lengths must match.
pub fn charge_difference(hole_charges: &[f64], particle_charges: &[f64]) -> ChargeResult<Vec<f64>> {
    check_inputs(hole_charges, particle_charges)?;
    Ok(particle_charges
        .iter()
        .zip(hole_charges)
        .map(|(p, h)| p - h)
        .collect())
}

/// Negative difference => donor, anything else => acceptor.
pub fn classify(charge_difference: &[f64]) -> DonorAcceptorSplit {
    let mut split = DonorAcceptorSplit::default();
    for (i, &diff) in charge_difference.iter().enumerate() {
        if diff < 0.0 {
            split.donors.push(i);
        } else {
            split.acceptors.push(i);
        }
    }
    split
}

fn check_inputs(hole_charges: &[f64], particle_charges: &[f64]) -> ChargeResult<()> {
    if hole_charges.is_empty() || particle_charges.is_empty() {
        return Err(ChargeError::invalid_input(format!(
            "empty input ({} hole charges, {} particle charges)",
            hole_charges.len(),
            particle_charges.len()
        )));
    }
    if hole_charges.len() != particle_charges.len() {
        return Err(ChargeError::dimension_mismatch(
            hole_charges.len(),
            particle_charges.len(),
        ));
    }
    for (kind, charges) in [("hole", hole_charges), ("particle", particle_charges)] {
        if let Some(i) = charges.iter().position(|c| !c.is_finite()) {
            return Err(ChargeError::invalid_input(format!(
                "{} charge of subgroup {} is not finite ({})",
                kind,
                i + 1,
                charges[i]
            )));
        }
    }
    Ok(())
}

/// Computes the (transposed) charge-transfer matrix and the charge difference.
///
/// # Errors
/// * `InvalidInput` for empty, mismatched or non-finite inputs, or when there is
///   no donor or no acceptor.
/// * `ArithmeticDegenerate` when the acceptors gained no charge at all.
///
/// # Example
/// ```
/// use charge_transitions::analysis::compute_transfer_and_difference;
///
/// let (transfer, diff) = compute_transfer_and_difference(&[0.5, 0.5], &[1.0, 0.0]).unwrap();
/// assert_eq!(diff, vec![0.5, -0.5]);
/// assert_eq!(transfer.columns(), &[vec![0.5, 0.0], vec![0.5, 0.0]]);
/// ```
pub fn compute_transfer_and_difference(
    hole_charges: &[f64],
    particle_charges: &[f64],
) -> ChargeResult<(TransferMatrix, Vec<f64>)> {
    let diff = charge_difference(hole_charges, particle_charges)?;
    let n = diff.len();
    let split = classify(&diff);

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_donor_acceptor_split {
        log::debug!(
            "Charge transfer: {} subgroups, donors {:?}, acceptors {:?}",
            n,
            split.donors,
            split.acceptors
        );
    }

    if split.acceptors.is_empty() {
        return Err(ChargeError::invalid_input("no acceptors"));
    }
    if split.donors.is_empty() {
        return Err(ChargeError::invalid_input("no donors"));
    }

    let mut transfer = TransferMatrix::zeros(n);
    for i in 0..n {
        transfer.set_stored(i, i, hole_charges[i].min(particle_charges[i]));
    }

    let total_acceptor_charge: f64 = split.acceptors.iter().map(|&a| diff[a]).sum();
    if total_acceptor_charge == 0.0 {
        return Err(ChargeError::degenerate(
            "total acceptor charge is zero (every acceptor is unchanged)",
        ));
    }

    for (&d, &a) in iproduct!(&split.donors, &split.acceptors) {
        transfer.set_stored(d, a, -diff[d] * (diff[a] / total_acceptor_charge));
    }

    Ok((transfer, diff))
}
