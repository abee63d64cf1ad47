// 🔗 Association Rules - Antecedent ⇒ Consequent
// Derives confident rules from frequent itemsets and their support counts

use crate::error::{check_fraction, MiningError, MiningResult};
use crate::itemset::{Itemset, MAX_ENUMERABLE_ITEMS};
use crate::miner::{FrequentLevels, MinedItemsets, SupportTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    /// Left-hand side, a non-empty proper subset of the source itemset
    pub antecedent: Itemset,

    /// Remaining items of the source itemset
    pub consequent: Itemset,

    /// support(antecedent ∪ consequent) / support(antecedent), in (0, 1]
    pub confidence: f64,

    /// Support fraction of antecedent ∪ consequent
    pub support: f64,

    /// confidence / support(consequent)
    pub lift: f64,
}

impl AssociationRule {
    /// The frequent itemset this rule was derived from.
    pub fn itemset(&self) -> Itemset {
        self.antecedent.union(&self.consequent)
    }
}

// ============================================================================
// RULE GENERATOR
// ============================================================================

pub struct RuleGenerator {
    min_confidence: f64,
}

impl RuleGenerator {
    pub fn new(min_confidence: f64) -> Self {
        RuleGenerator { min_confidence }
    }

    /// Derive rules from a finished mining run.
    pub fn generate(&self, mined: &MinedItemsets) -> MiningResult<Vec<AssociationRule>> {
        generate_rules(
            &mined.levels,
            &mined.support_table,
            mined.total_transactions,
            self.min_confidence,
        )
    }
}

/// Emit every rule `E ⇒ I \ E` with confidence at or above `min_confidence`,
/// for each frequent itemset `I` of two or more items and each non-empty
/// proper subset `E`.
///
/// Rules come out in level order, then itemset order, then subset mask order.
pub fn generate_rules(
    levels: &FrequentLevels,
    table: &SupportTable,
    total_transactions: usize,
    min_confidence: f64,
) -> MiningResult<Vec<AssociationRule>> {
    check_fraction("min_confidence", min_confidence)?;
    if total_transactions == 0 {
        return Err(MiningError::EmptyInput);
    }

    let total = total_transactions as f64;
    let mut rules = Vec::new();

    for (k, itemsets) in levels.levels().filter(|(k, _)| *k >= 2) {
        let before = rules.len();

        for itemset in itemsets {
            let itemset_count = support_count(table, itemset, itemset)?;
            let subsets = itemset.proper_subsets().ok_or(MiningError::ItemsetTooLarge {
                size: itemset.len(),
                limit: MAX_ENUMERABLE_ITEMS,
            })?;

            for antecedent in subsets {
                let antecedent_count = support_count(table, &antecedent, itemset)?;
                let confidence = itemset_count as f64 / antecedent_count as f64;

                if confidence < min_confidence {
                    continue;
                }

                let consequent = itemset.difference(&antecedent);
                let consequent_count = support_count(table, &consequent, itemset)?;
                let support = itemset_count as f64 / total;

                rules.push(AssociationRule {
                    antecedent,
                    consequent,
                    confidence,
                    support,
                    lift: confidence / (consequent_count as f64 / total),
                });
            }
        }

        debug!(level = k, rules = rules.len() - before, "rules derived");
    }

    info!(rules = rules.len(), min_confidence, "rule generation finished");
    Ok(rules)
}

/// Count for a subset of a frequent itemset. Downward closure guarantees it
/// was counted and is non-zero; anything else is a broken upstream step.
fn support_count(table: &SupportTable, subset: &Itemset, source: &Itemset) -> MiningResult<usize> {
    match table.count(subset) {
        Some(count) if count > 0 => Ok(count),
        _ => Err(MiningError::ArithmeticInvariantViolation {
            antecedent: subset.to_string(),
            itemset: source.to_string(),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::{Apriori, ItemsetMiner};
    use crate::transaction::Transaction;

    fn set(items: &[&str]) -> Itemset {
        Itemset::new(items.iter().copied())
    }

    fn worked_example() -> MinedItemsets {
        let transactions = vec![
            Transaction::new(["A", "B", "C"]),
            Transaction::new(["A", "B"]),
            Transaction::new(["A", "C"]),
            Transaction::new(["B", "C"]),
            Transaction::new(["A"]),
        ];
        Apriori::new(0.4).mine(&transactions).unwrap()
    }

    fn find<'a>(rules: &'a [AssociationRule], lhs: &[&str], rhs: &[&str]) -> Option<&'a AssociationRule> {
        rules
            .iter()
            .find(|r| r.antecedent == set(lhs) && r.consequent == set(rhs))
    }

    #[test]
    fn test_worked_example_rules() {
        let rules = RuleGenerator::new(0.6).generate(&worked_example()).unwrap();

        let b_a = find(&rules, &["B"], &["A"]).expect("B => A");
        assert!((b_a.confidence - 2.0 / 3.0).abs() < 1e-12);
        assert!((b_a.support - 0.4).abs() < 1e-12);

        let c_a = find(&rules, &["C"], &["A"]).expect("C => A");
        assert!((c_a.confidence - 2.0 / 3.0).abs() < 1e-12);

        assert!(find(&rules, &["A"], &["B"]).is_none());
        assert!(find(&rules, &["A"], &["C"]).is_none());

        // B => C and C => B also reach 2/3
        assert_eq!(rules.len(), 4);
    }

    #[test]
    fn test_confidence_bounds_and_partition() {
        let rules = RuleGenerator::new(0.1).generate(&worked_example()).unwrap();

        // Three 2-itemsets, two rules each
        assert_eq!(rules.len(), 6);
        for rule in &rules {
            assert!(rule.confidence > 0.0 && rule.confidence <= 1.0);
            assert!(!rule.antecedent.is_empty());
            assert!(!rule.consequent.is_empty());
            assert!(rule.antecedent.difference(&rule.consequent) == rule.antecedent);
            assert_eq!(rule.itemset().len(), 2);
        }
    }

    #[test]
    fn test_lift() {
        let rules = RuleGenerator::new(0.5).generate(&worked_example()).unwrap();
        let a_b = find(&rules, &["A"], &["B"]).unwrap();

        // conf 0.5 / support(B) 0.6
        assert!((a_b.lift - 0.5 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_no_levels_no_rules() {
        let rules = generate_rules(&FrequentLevels::default(), &SupportTable::new(), 5, 0.5).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_missing_antecedent_support_fails_loudly() {
        let mut mined = worked_example();
        let mut broken = SupportTable::new();
        broken.merge(
            mined
                .support_table
                .iter()
                .filter(|(itemset, _)| *itemset != &set(&["B"]))
                .map(|(itemset, count)| (itemset.clone(), count))
                .collect::<Vec<_>>(),
        );
        mined.support_table = broken;

        let result = RuleGenerator::new(0.5).generate(&mined);
        assert!(matches!(
            result,
            Err(MiningError::ArithmeticInvariantViolation { .. })
        ));
    }

    #[test]
    fn test_invalid_confidence() {
        let mined = worked_example();
        assert!(matches!(
            RuleGenerator::new(0.0).generate(&mined),
            Err(MiningError::InvalidConfiguration { field: "min_confidence", .. })
        ));
        assert!(matches!(
            generate_rules(&mined.levels, &mined.support_table, 0, 0.5),
            Err(MiningError::EmptyInput)
        ));
    }
}
