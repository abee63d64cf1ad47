// 🧺 Itemsets - Order-independent sets of items
// Normalized item collections usable as map keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque item identifier (a token from the source data).
pub type Item = String;

/// Largest itemset whose proper subsets can be enumerated with a `u64` mask.
pub const MAX_ENUMERABLE_ITEMS: usize = 63;

// ============================================================================
// ITEMSET
// ============================================================================

/// A set of distinct items.
///
/// Items are kept sorted and deduplicated, so two itemsets built from the same
/// elements in any order compare equal and hash identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<Item>", into = "Vec<Item>")]
pub struct Itemset {
    items: Vec<Item>,
}

impl Itemset {
    /// Build an itemset from any collection of items. Duplicates collapse.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Item>,
    {
        let mut items: Vec<Item> = items.into_iter().map(Into::into).collect();
        items.sort_unstable();
        items.dedup();
        Itemset { items }
    }

    pub fn singleton(item: impl Into<Item>) -> Self {
        Itemset {
            items: vec![item.into()],
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items
            .binary_search_by(|probe| probe.as_str().cmp(item))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    /// True when every item of `self` is also in `other`.
    ///
    /// Both sides are sorted, so this is a single merge walk.
    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        if self.items.len() > other.items.len() {
            return false;
        }

        let mut theirs = other.items.iter();
        'outer: for mine in &self.items {
            for candidate in theirs.by_ref() {
                match candidate.cmp(mine) {
                    std::cmp::Ordering::Less => continue,
                    std::cmp::Ordering::Equal => continue 'outer,
                    std::cmp::Ordering::Greater => return false,
                }
            }
            return false;
        }

        true
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        Itemset::new(self.items.iter().chain(other.items.iter()).cloned())
    }

    /// Items of `self` that are not in `other`.
    pub fn difference(&self, other: &Itemset) -> Itemset {
        Itemset {
            items: self
                .items
                .iter()
                .filter(|item| !other.contains(item))
                .cloned()
                .collect(),
        }
    }

    /// Every non-empty proper subset, enumerated by bitmask.
    ///
    /// Yields `2^n - 2` itemsets. Returns `None` when the itemset is too
    /// large for a `u64` mask.
    pub fn proper_subsets(&self) -> Option<ProperSubsets<'_>> {
        if self.items.len() > MAX_ENUMERABLE_ITEMS {
            return None;
        }

        let full = if self.items.is_empty() {
            0
        } else {
            (1u64 << self.items.len()) - 1
        };

        Some(ProperSubsets {
            items: &self.items,
            next_mask: 1,
            full,
        })
    }
}

impl<S: Into<Item>> FromIterator<S> for Itemset {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Itemset::new(iter)
    }
}

impl From<Vec<Item>> for Itemset {
    fn from(items: Vec<Item>) -> Self {
        Itemset::new(items)
    }
}

impl From<Itemset> for Vec<Item> {
    fn from(itemset: Itemset) -> Self {
        itemset.items
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.items.join(", "))
    }
}

// ============================================================================
// SUBSET ENUMERATION
// ============================================================================

/// Iterator over the non-empty proper subsets of an itemset.
pub struct ProperSubsets<'a> {
    items: &'a [Item],
    next_mask: u64,
    full: u64,
}

impl Iterator for ProperSubsets<'_> {
    type Item = Itemset;

    fn next(&mut self) -> Option<Itemset> {
        if self.next_mask >= self.full {
            return None;
        }

        let mask = self.next_mask;
        self.next_mask += 1;

        // Picking from a sorted slice keeps the subset sorted
        let items = self
            .items
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1u64 << bit) != 0)
            .map(|(_, item)| item.clone())
            .collect();

        Some(Itemset { items })
    }
}

// ============================================================================
// TESTS
// ============================================================================
