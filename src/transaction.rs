// 🧾 Transactions - Immutable baskets of items
// A dataset is loaded once and shared read-only across all mining levels

use crate::itemset::{Item, Itemset};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

// ============================================================================
// TRANSACTION
// ============================================================================

/// One basket of distinct items. Duplicate items collapse on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction {
    items: Itemset,
}

impl Transaction {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Item>,
    {
        Transaction {
            items: Itemset::new(items),
        }
    }

    pub fn items(&self) -> &Itemset {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the basket holds every item of `itemset`.
    pub fn contains_all(&self, itemset: &Itemset) -> bool {
        itemset.is_subset_of(&self.items)
    }
}

impl From<Itemset> for Transaction {
    fn from(items: Itemset) -> Self {
        Transaction { items }
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// The full, materialized transaction collection for one run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    transactions: Vec<Transaction>,
}

impl Dataset {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Dataset { transactions }
    }

    /// Build a dataset from raw item lists.
    pub fn from_baskets<B, I, S>(baskets: B) -> Self
    where
        B: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<Item>,
    {
        Dataset {
            transactions: baskets.into_iter().map(Transaction::new).collect(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Every item seen in any transaction, in sorted order.
    pub fn distinct_items(&self) -> BTreeSet<&Item> {
        self.transactions
            .iter()
            .flat_map(|tx| tx.items().iter())
            .collect()
    }

    /// SHA-256 over the canonicalized transactions.
    ///
    /// Transaction order does not affect the digest, so two runs over the
    /// same baskets can be matched up from their reports.
    pub fn fingerprint(&self) -> String {
        let mut canonical: Vec<String> = self
            .transactions
            .iter()
            .map(|tx| tx.items().as_slice().join("\u{1f}"))
            .collect();
        canonical.sort_unstable();

        let mut hasher = Sha256::new();
        for line in &canonical {
            hasher.update(line.as_bytes());
            hasher.update(b"\x1e");
        }
        format!("{:x}", hasher.finalize())
    }
}

impl From<Vec<Transaction>> for Dataset {
    fn from(transactions: Vec<Transaction>) -> Self {
        Dataset::new(transactions)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let tx = Transaction::new(["beer", "chips", "beer"]);
        assert_eq!(tx.len(), 2);
        assert!(tx.contains_all(&Itemset::new(["chips", "beer"])));
        assert!(!tx.contains_all(&Itemset::new(["chips", "salsa"])));
    }

    #[test]
    fn test_distinct_items() {
        let dataset = Dataset::from_baskets(vec![vec!["b", "a"], vec!["c", "a"]]);
        let items: Vec<&str> = dataset.distinct_items().into_iter().map(|s| s.as_str()).collect();
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fingerprint_ignores_order() {
        let one = Dataset::from_baskets(vec![vec!["a", "b"], vec!["c"]]);
        let two = Dataset::from_baskets(vec![vec!["c"], vec!["b", "a"]]);
        let three = Dataset::from_baskets(vec![vec!["a"], vec!["b", "c"]]);

        assert_eq!(one.fingerprint(), two.fingerprint());
        assert_ne!(one.fingerprint(), three.fingerprint());
        assert_eq!(one.fingerprint().len(), 64);
    }
}
