use serde::{Deserialize, Serialize};

/// Square charge-transfer matrix stored as `n` columns of `n` values.
///
/// Storage is the transpose of the conceptual matrix: `columns[d][a]` holds the
/// charge moved from donor `d` to acceptor `a`, and `columns[i][i]` the charge
/// subgroup `i` keeps for itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferMatrix {
    columns: Vec<Vec<f64>>,
}

impl TransferMatrix {
    /// All-zero matrix of size `n`
    pub fn zeros(n: usize) -> Self {
        Self {
            columns: vec![vec![0.0; n]; n],
        }
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    pub fn column(&self, i: usize) -> &[f64] {
        &self.columns[i]
    }

    pub fn into_columns(self) -> Vec<Vec<f64>> {
        self.columns
    }

    pub(crate) fn set_stored(&mut self, column: usize, row: usize, value: f64) {
        self.columns[column][row] = value;
    }

    /// Entry of the conceptual (non-transposed) matrix
    pub fn entry(&self, row: usize, col: usize) -> f64 {
        self.columns[col][row]
    }

    /// Charge that subgroup `i` hands to others (off-diagonal part of its column)
    pub fn outflow(&self, i: usize) -> f64 {
        self.columns[i]
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, v)| v)
            .sum()
    }
}

impl From<TransferMatrix> for Vec<Vec<f64>> {
    fn from(matrix: TransferMatrix) -> Self {
        matrix.into_columns()
    }
}
