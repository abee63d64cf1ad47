// Basket Miner - Core Library
// Frequent itemsets and association rules (Apriori) for CLI, API server, and tests

pub mod error;
pub mod itemset;
pub mod transaction;
pub mod config;
pub mod miner;          // Level-wise itemset search
pub mod rules;          // Rule derivation from frequent itemsets
pub mod engine;
pub mod source;         // Transaction sources (CSV, in-memory)
pub mod report;         // Result sink

// Re-export commonly used types
pub use error::{MiningError, MiningResult};
pub use itemset::{Item, Itemset};
pub use transaction::{Dataset, Transaction};
pub use config::MiningConfig;
pub use miner::{
    Apriori, FrequentLevels, ItemsetMiner, MinedItemsets, SupportTable,
    count_support, initial_candidates, join_candidates, prune,
};
pub use rules::{AssociationRule, RuleGenerator, generate_rules};
pub use engine::{Analysis, analyze};
pub use source::{CsvBasketSource, InMemorySource, TransactionSource, resolve_dataset};
pub use report::{ItemsetSupport, MiningReport, RuleReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
