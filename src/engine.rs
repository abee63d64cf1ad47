// 🚂 Mining Engine
// Transactions → Itemset Miner → Rule Generator

use crate::config::MiningConfig;
use crate::error::{MiningError, MiningResult};
use crate::miner::{Apriori, ItemsetMiner, MinedItemsets};
use crate::rules::{AssociationRule, RuleGenerator};
use crate::transaction::Dataset;

/// Frequent itemsets and rules from one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub mined: MinedItemsets,
    pub rules: Vec<AssociationRule>,
}

/// Validate, mine and derive rules. Fails before any counting if the
/// configuration or input is unusable.
pub fn analyze(dataset: &Dataset, config: &MiningConfig) -> MiningResult<Analysis> {
    config.validate()?;
    if dataset.is_empty() {
        return Err(MiningError::EmptyInput);
    }

    let mined = Apriori::from_config(config).mine(dataset.transactions())?;
    let rules = RuleGenerator::new(config.min_confidence).generate(&mined)?;

    Ok(Analysis { mined, rules })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_is_deterministic() {
        let dataset = Dataset::from_baskets(vec![
            vec!["A", "B", "C"],
            vec!["A", "B"],
            vec!["A", "C"],
            vec!["B", "C"],
            vec!["A"],
        ]);
        let config = MiningConfig::new(0.4, 0.6);

        let first = analyze(&dataset, &config).unwrap();
        let second = analyze(&dataset, &config.clone().with_parallel(true)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.rules.len(), 4);
    }

    #[test]
    fn test_analyze_rejects_before_mining() {
        let empty = Dataset::default();
        assert_eq!(
            analyze(&empty, &MiningConfig::new(0.5, 0.5)),
            Err(MiningError::EmptyInput)
        );

        let dataset = Dataset::from_baskets(vec![vec!["a"]]);
        assert!(matches!(
            analyze(&dataset, &MiningConfig::new(0.5, 0.0)),
            Err(MiningError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_high_support_yields_nothing() {
        let dataset = Dataset::from_baskets(vec![vec!["a", "b"], vec!["b", "c"], vec!["a", "c"]]);
        let analysis = analyze(&dataset, &MiningConfig::new(1.0, 0.5)).unwrap();

        assert!(analysis.mined.levels.is_empty());
        assert!(analysis.rules.is_empty());
    }
}
