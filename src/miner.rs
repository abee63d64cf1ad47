// ⛏️ Itemset Miner - Level-wise Apriori search
// Candidate generation, support counting and anti-monotone pruning

use crate::config::MiningConfig;
use crate::error::{check_fraction, MiningError, MiningResult};
use crate::itemset::Itemset;
use crate::transaction::Transaction;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

// ============================================================================
// SUPPORT TABLE
// ============================================================================

/// Occurrence counts for every candidate counted during a run.
///
/// Entries are only ever added. Infrequent candidates keep their counts too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportTable {
    counts: HashMap<Itemset, usize>,
}

impl SupportTable {
    pub fn new() -> Self {
        SupportTable::default()
    }

    /// Number of transactions containing `itemset`, if it was counted.
    pub fn count(&self, itemset: &Itemset) -> Option<usize> {
        self.counts.get(itemset).copied()
    }

    pub fn fraction(&self, itemset: &Itemset, total_transactions: usize) -> Option<f64> {
        if total_transactions == 0 {
            return None;
        }
        self.count(itemset)
            .map(|count| count as f64 / total_transactions as f64)
    }

    /// Fold one level's counts into the table.
    pub fn merge<I>(&mut self, counts: I)
    where
        I: IntoIterator<Item = (Itemset, usize)>,
    {
        for (itemset, count) in counts {
            *self.counts.entry(itemset).or_insert(0) += count;
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, usize)> {
        self.counts.iter().map(|(itemset, count)| (itemset, *count))
    }
}

// ============================================================================
// FREQUENT LEVELS
// ============================================================================

/// Frequent itemsets grouped by cardinality.
///
/// Only non-empty levels are stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequentLevels {
    levels: BTreeMap<usize, BTreeSet<Itemset>>,
}

impl FrequentLevels {
    pub fn level(&self, k: usize) -> Option<&BTreeSet<Itemset>> {
        self.levels.get(&k)
    }

    pub fn levels(&self) -> impl Iterator<Item = (usize, &BTreeSet<Itemset>)> {
        self.levels.iter().map(|(k, set)| (*k, set))
    }

    pub fn max_level(&self) -> Option<usize> {
        self.levels.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn itemset_count(&self) -> usize {
        self.levels.values().map(BTreeSet::len).sum()
    }

    /// All frequent itemsets, smallest level first.
    pub fn iter(&self) -> impl Iterator<Item = &Itemset> {
        self.levels.values().flat_map(|set| set.iter())
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.levels
            .get(&itemset.len())
            .is_some_and(|set| set.contains(itemset))
    }

    fn insert_level(&mut self, k: usize, frequent: BTreeSet<Itemset>) {
        if !frequent.is_empty() {
            self.levels.insert(k, frequent);
        }
    }
}

// ============================================================================
// MINING OUTPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MinedItemsets {
    pub support_table: SupportTable,
    pub levels: FrequentLevels,
    pub total_transactions: usize,
}

impl MinedItemsets {
    /// Support fraction of a counted itemset.
    pub fn support(&self, itemset: &Itemset) -> Option<f64> {
        self.support_table.fraction(itemset, self.total_transactions)
    }

    /// `(itemset, support fraction)` for every frequent itemset.
    pub fn frequent_itemsets(&self) -> Vec<(Itemset, f64)> {
        self.levels
            .iter()
            .filter_map(|itemset| {
                self.support(itemset)
                    .map(|support| (itemset.clone(), support))
            })
            .collect()
    }
}

// ============================================================================
// MINER
// ============================================================================

pub trait ItemsetMiner {
    fn mine(&self, transactions: &[Transaction]) -> MiningResult<MinedItemsets>;
}

/// Level-wise frequent itemset search.
#[derive(Debug, Clone)]
pub struct Apriori {
    min_support: f64,
    max_itemset_size: Option<usize>,
    parallel: bool,
}

impl Apriori {
    pub fn new(min_support: f64) -> Self {
        Apriori {
            min_support,
            max_itemset_size: None,
            parallel: false,
        }
    }

    pub fn from_config(config: &MiningConfig) -> Self {
        Apriori {
            min_support: config.min_support,
            max_itemset_size: config.max_itemset_size,
            parallel: config.parallel,
        }
    }

    pub fn with_max_itemset_size(mut self, max: usize) -> Self {
        self.max_itemset_size = Some(max);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl ItemsetMiner for Apriori {
    fn mine(&self, transactions: &[Transaction]) -> MiningResult<MinedItemsets> {
        check_fraction("min_support", self.min_support)?;
        if self.max_itemset_size == Some(0) {
            return Err(MiningError::InvalidConfiguration {
                field: "max_itemset_size",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        if transactions.is_empty() {
            return Err(MiningError::EmptyInput);
        }

        let total = transactions.len();
        info!(
            transactions = total,
            min_support = self.min_support,
            parallel = self.parallel,
            "mining frequent itemsets"
        );

        let mut table = SupportTable::new();
        let mut levels = FrequentLevels::default();
        let mut candidates = initial_candidates(transactions);
        let mut k = 1;

        // An empty candidate set simply prunes to an empty level
        loop {
            let counts = count_support(&candidates, transactions, self.parallel);
            let frequent = prune(&counts, total, self.min_support);
            table.merge(counts);

            debug!(
                level = k,
                candidates = candidates.len(),
                frequent = frequent.len(),
                "level counted"
            );

            if frequent.is_empty() {
                break;
            }

            let next = join_candidates(&frequent, k + 1);
            levels.insert_level(k, frequent);

            if self.max_itemset_size.is_some_and(|max| k >= max) {
                if !next.is_empty() {
                    warn!(
                        max_itemset_size = k,
                        pending_candidates = next.len(),
                        "itemset size cap reached, stopping early"
                    );
                }
                break;
            }

            candidates = next;
            k += 1;
        }

        info!(
            levels = levels.max_level().unwrap_or(0),
            frequent = levels.itemset_count(),
            counted = table.len(),
            "mining finished"
        );

        Ok(MinedItemsets {
            support_table: table,
            levels,
            total_transactions: total,
        })
    }
}

// ============================================================================
// LEVEL STEPS
// ============================================================================

/// Every distinct single item appearing in any transaction.
pub fn initial_candidates(transactions: &[Transaction]) -> BTreeSet<Itemset> {
    transactions
        .iter()
        .flat_map(|tx| tx.items().iter())
        .map(|item| Itemset::singleton(item.clone()))
        .collect()
}

/// Count how many transactions contain each candidate.
///
/// Candidates are independent, so the parallel path counts each on the rayon
/// pool and the caller merges the result into the support table afterward.
pub fn count_support(
    candidates: &BTreeSet<Itemset>,
    transactions: &[Transaction],
    parallel: bool,
) -> Vec<(Itemset, usize)> {
    let count_one = |candidate: &Itemset| {
        let count = transactions
            .iter()
            .filter(|tx| tx.contains_all(candidate))
            .count();
        (candidate.clone(), count)
    };

    if parallel {
        let ordered: Vec<&Itemset> = candidates.iter().collect();
        ordered.into_par_iter().map(count_one).collect()
    } else {
        candidates.iter().map(count_one).collect()
    }
}

/// Keep the candidates whose support fraction meets `min_support`.
pub fn prune(counts: &[(Itemset, usize)], total: usize, min_support: f64) -> BTreeSet<Itemset> {
    counts
        .iter()
        .filter(|(_, count)| *count as f64 / total as f64 >= min_support)
        .map(|(itemset, _)| itemset.clone())
        .collect()
}

/// Pairwise self-join of frequent `k`-itemsets into `size`-item candidates.
pub fn join_candidates(frequent: &BTreeSet<Itemset>, size: usize) -> BTreeSet<Itemset> {
    let sets: Vec<&Itemset> = frequent.iter().collect();
    let mut candidates = BTreeSet::new();

    for (i, left) in sets.iter().enumerate() {
        for right in &sets[i + 1..] {
            let union = left.union(right);
            if union.len() == size {
                candidates.insert(union);
            }
        }
    }

    candidates
}

// ============================================================================
// TESTS
// ============================================================================
