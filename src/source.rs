// 📥 Transaction Sources
// Where baskets come from: CSV basket files or in-memory lists

use crate::itemset::Item;
use crate::transaction::{Dataset, Transaction};
use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// CORE TRAIT
// ============================================================================

/// TransactionSource - anything that can hand the miner a finished dataset
///
/// A source loads everything or fails; the miner never sees a partial load.
pub trait TransactionSource: Send + Sync {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Load every transaction
    fn load(&self) -> Result<Dataset>;
}

// ============================================================================
// CSV BASKETS
// ============================================================================

/// One basket per line, items separated by commas, no header row.
///
/// Example:
/// ```text
/// Milk,Bread,Eggs,
/// Bread,Butter
/// ```
/// Fields are trimmed and empty fields (trailing separators) are dropped.
pub struct CsvBasketSource {
    path: PathBuf,
    name: String,
}

impl CsvBasketSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        CsvBasketSource { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse baskets from any reader.
    pub fn read_from<R: std::io::Read>(reader: R, label: &str) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut transactions = Vec::new();

        for (index, result) in reader.byte_records().enumerate() {
            let record = result
                .with_context(|| format!("Failed to parse basket {} in {}", index + 1, label))?;

            let items: Vec<Item> = record
                .iter()
                .filter(|field| !field.is_empty())
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect();

            if items.is_empty() {
                debug!(line = index + 1, source = label, "skipping empty basket");
                continue;
            }

            transactions.push(Transaction::new(items));
        }

        Ok(Dataset::new(transactions))
    }
}

impl TransactionSource for CsvBasketSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Dataset> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open file: {}", self.path.display()))?;

        let dataset = CsvBasketSource::read_from(file, &self.name)?;
        info!(
            source = %self.path.display(),
            transactions = dataset.len(),
            "loaded baskets"
        );

        Ok(dataset)
    }
}

// ============================================================================
// IN-MEMORY
// ============================================================================

/// Baskets that are already in memory (tests, HTTP payloads).
pub struct InMemorySource {
    name: String,
    baskets: Vec<Vec<Item>>,
}

impl InMemorySource {
    pub fn new(name: &str, baskets: Vec<Vec<Item>>) -> Self {
        InMemorySource {
            name: name.to_string(),
            baskets,
        }
    }
}

impl TransactionSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Dataset> {
        Ok(Dataset::from_baskets(self.baskets.iter().cloned()))
    }
}

// ============================================================================
// DATASET CATALOGUE
// ============================================================================

/// Resolve a dataset argument to a file path
///
/// A bare name such as `amazon` maps to `<data_dir>/amazon.csv`; anything
/// with an extension or a directory component is taken as a path.
pub fn resolve_dataset(name: &str, data_dir: &Path) -> PathBuf {
    let candidate = Path::new(name);

    if candidate.extension().is_some() || candidate.components().count() > 1 {
        return candidate.to_path_buf();
    }

    data_dir.join(format!("{}.csv", name))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset::Itemset;

    #[test]
    fn test_trailing_separators_and_whitespace() {
        let data = "Milk, Bread ,Eggs,\nBread,Butter,,\n\n  ,\nMilk\n";
        let dataset = CsvBasketSource::read_from(data.as_bytes(), "inline").unwrap();

        assert_eq!(dataset.len(), 3);
        let first = &dataset.transactions()[0];
        assert_eq!(first.items(), &Itemset::new(["Bread", "Eggs", "Milk"]));
        assert_eq!(dataset.transactions()[1].len(), 2);
    }

    #[test]
    fn test_duplicate_items_collapse() {
        let dataset = CsvBasketSource::read_from("a,b,a,a\n".as_bytes(), "inline").unwrap();
        assert_eq!(dataset.transactions()[0].len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let source = CsvBasketSource::new("/definitely/not/here/baskets.csv");
        assert_eq!(source.name(), "baskets");
        assert!(source.load().is_err());
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new(
            "memory",
            vec![vec!["x".to_string(), "y".to_string()], vec!["y".to_string()]],
        );
        let dataset = source.load().unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(source.name(), "memory");
    }

    #[test]
    fn test_resolve_dataset() {
        let dir = Path::new("/data");
        assert_eq!(resolve_dataset("amazon", dir), PathBuf::from("/data/amazon.csv"));
        assert_eq!(resolve_dataset("own.csv", dir), PathBuf::from("own.csv"));
        assert_eq!(
            resolve_dataset("sets/kmart", dir),
            PathBuf::from("sets/kmart")
        );
    }
}
