// 🚨 Mining Errors
// Structural failures of the itemset miner and rule generator

use thiserror::Error;

/// Errors raised by the mining core.
///
/// None of these are transient: the core does no I/O, so every variant means
/// the run must stop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MiningError {
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("no transactions supplied: support fractions are undefined")]
    EmptyInput,

    #[error("support invariant violated: antecedent [{antecedent}] of itemset [{itemset}] has no support")]
    ArithmeticInvariantViolation { antecedent: String, itemset: String },

    #[error("itemset of {size} items exceeds the enumeration limit of {limit}")]
    ItemsetTooLarge { size: usize, limit: usize },
}

impl MiningError {
    /// Build an `InvalidConfiguration` for a threshold outside (0, 1].
    pub fn threshold(field: &'static str, value: f64) -> Self {
        MiningError::InvalidConfiguration {
            field,
            value: value.to_string(),
            reason: "must lie in (0, 1]",
        }
    }
}

pub type MiningResult<T> = Result<T, MiningError>;

/// Check a fraction-valued threshold.
pub(crate) fn check_fraction(field: &'static str, value: f64) -> MiningResult<()> {
    // NaN fails both comparisons
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(MiningError::threshold(field, value))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_fraction_bounds() {
        assert!(check_fraction("min_support", 1.0).is_ok());
        assert!(check_fraction("min_support", 0.0001).is_ok());
        assert!(check_fraction("min_support", 0.0).is_err());
        assert!(check_fraction("min_support", 1.5).is_err());
        assert!(check_fraction("min_support", -0.2).is_err());
        assert!(check_fraction("min_support", f64::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = MiningError::threshold("min_confidence", 2.0);
        assert_eq!(
            err.to_string(),
            "invalid configuration: min_confidence = 2 (must lie in (0, 1])"
        );

        let err = MiningError::ArithmeticInvariantViolation {
            antecedent: "a".to_string(),
            itemset: "a, b".to_string(),
        };
        assert!(err.to_string().contains("[a]"));
        assert!(err.to_string().contains("[a, b]"));
    }
}
