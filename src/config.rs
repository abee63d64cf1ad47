// ⚙️ Mining Configuration
// Support/confidence thresholds and run guards

use crate::error::{check_fraction, MiningError, MiningResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Minimum fraction of transactions an itemset must appear in, (0, 1]
    pub min_support: f64,

    /// Minimum conditional probability for a reported rule, (0, 1]
    pub min_confidence: f64,

    /// Stop after this itemset size even if larger frequent sets exist
    #[serde(default)]
    pub max_itemset_size: Option<usize>,

    /// Count candidate support on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

impl MiningConfig {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        MiningConfig {
            min_support,
            min_confidence,
            max_itemset_size: None,
            parallel: false,
        }
    }

    /// Build from whole-number percentages (40 → 0.4).
    pub fn from_percentages(support_pct: u32, confidence_pct: u32) -> Self {
        MiningConfig::new(support_pct as f64 / 100.0, confidence_pct as f64 / 100.0)
    }

    /// Load a JSON config file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: MiningConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    pub fn with_max_itemset_size(mut self, max: usize) -> Self {
        self.max_itemset_size = Some(max);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject thresholds outside (0, 1] and a zero size cap.
    pub fn validate(&self) -> MiningResult<()> {
        check_fraction("min_support", self.min_support)?;
        check_fraction("min_confidence", self.min_confidence)?;

        if self.max_itemset_size == Some(0) {
            return Err(MiningError::InvalidConfiguration {
                field: "max_itemset_size",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_percentages() {
        let config = MiningConfig::from_percentages(40, 60);
        assert_eq!(config.min_support, 0.4);
        assert_eq!(config.min_confidence, 0.6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_thresholds() {
        assert!(matches!(
            MiningConfig::from_percentages(0, 50).validate(),
            Err(MiningError::InvalidConfiguration { field: "min_support", .. })
        ));
        assert!(matches!(
            MiningConfig::new(0.5, 1.2).validate(),
            Err(MiningError::InvalidConfiguration { field: "min_confidence", .. })
        ));
        assert!(MiningConfig::new(1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_zero_size_cap_rejected() {
        let config = MiningConfig::new(0.5, 0.5).with_max_itemset_size(0);
        assert!(matches!(
            config.validate(),
            Err(MiningError::InvalidConfiguration { field: "max_itemset_size", .. })
        ));
    }

    #[test]
    fn test_from_file_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_support": 0.25, "min_confidence": 0.7}}"#).unwrap();

        let config = MiningConfig::from_file(file.path()).unwrap();
        assert_eq!(config.min_support, 0.25);
        assert_eq!(config.max_itemset_size, None);
        assert!(!config.parallel);
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_support": 0.0, "min_confidence": 0.7}}"#).unwrap();

        assert!(MiningConfig::from_file(file.path()).is_err());
    }
}
