//! Error types for the charge-transition computations.

use thiserror::Error;

/// Errors raised by the core computations.
///
/// Every variant aborts the current operation; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChargeError {
    /// A structural precondition on the inputs was violated.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: String,
    },

    /// A required named column or diagonal entry could not be resolved.
    #[error("Data access error: {what}")]
    DataAccess {
        /// Which column (and subgroup) was missing
        what: String,
    },

    /// A division by a zero total was about to happen.
    #[error("Arithmetic degenerate: {what}")]
    ArithmeticDegenerate {
        /// Which total was zero
        what: String,
    },
}

impl ChargeError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn data_access(what: impl Into<String>) -> Self {
        Self::DataAccess { what: what.into() }
    }

    pub fn degenerate(what: impl Into<String>) -> Self {
        Self::ArithmeticDegenerate { what: what.into() }
    }

    /// Shorthand for the most common structural failure.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::invalid_input(format!(
            "dimension mismatch (expected {expected}, actual {actual})"
        ))
    }
}

pub type ChargeResult<T> = std::result::Result<T, ChargeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ChargeError::dimension_mismatch(2, 3).to_string(),
            "Invalid input: dimension mismatch (expected 2, actual 3)"
        );
        assert_eq!(
            ChargeError::data_access("hole column, subgroup 4").to_string(),
            "Data access error: hole column, subgroup 4"
        );
        assert!(
            ChargeError::degenerate("total acceptor charge is zero")
                .to_string()
                .starts_with("Arithmetic degenerate")
        );
    }
}
