// 📊 Mining Report - Result Sink
// Itemsets by support, rules by confidence, plus run provenance

use crate::config::MiningConfig;
use crate::engine::Analysis;
use crate::itemset::Itemset;
use crate::rules::AssociationRule;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Write;

// ============================================================================
// REPORT TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ItemsetSupport {
    pub itemset: Itemset,
    pub support: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleReport {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub confidence: f64,
    pub support: f64,
    pub lift: f64,
}

impl From<AssociationRule> for RuleReport {
    fn from(rule: AssociationRule) -> Self {
        Self {
            antecedent: rule.antecedent,
            consequent: rule.consequent,
            confidence: rule.confidence,
            support: rule.support,
            lift: rule.lift,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MiningReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub dataset_fingerprint: String,
    pub total_transactions: usize,
    pub min_support: f64,
    pub min_confidence: f64,
    /// Ascending support
    pub itemsets: Vec<ItemsetSupport>,
    /// Descending confidence
    pub rules: Vec<RuleReport>,
}

impl MiningReport {
    pub fn new(source: &str, fingerprint: String, config: &MiningConfig, analysis: Analysis) -> Self {
        let mut itemsets: Vec<ItemsetSupport> = analysis
            .mined
            .frequent_itemsets()
            .into_iter()
            .map(|(itemset, support)| ItemsetSupport { itemset, support })
            .collect();
        itemsets.sort_by(|a, b| {
            a.support
                .partial_cmp(&b.support)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.itemset.cmp(&b.itemset))
        });

        let mut rules: Vec<RuleReport> = analysis.rules.into_iter().map(RuleReport::from).collect();
        rules.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.antecedent.cmp(&b.antecedent))
                .then_with(|| a.consequent.cmp(&b.consequent))
        });

        MiningReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            source: source.to_string(),
            dataset_fingerprint: fingerprint,
            total_transactions: analysis.mined.total_transactions,
            min_support: config.min_support,
            min_confidence: config.min_confidence,
            itemsets,
            rules,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    /// `a, b ====> 0.4`, one itemset per line.
    pub fn render_supports(&self) -> String {
        let mut out = String::new();
        for entry in &self.itemsets {
            let _ = writeln!(out, "{} ====> {}", entry.itemset, entry.support);
        }
        out
    }

    /// `a   =========>   b |  with confidence: 0.667`, one rule per line.
    pub fn render_rules(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            let _ = writeln!(
                out,
                "{}   =========>   {} |  with confidence: {:.3}",
                rule.antecedent, rule.consequent, rule.confidence
            );
        }
        out
    }
}

// ============================================================================
// TESTS
// ============================================================================
