use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::diagnosis::Diagnosis;
use super::weights::WeightCategory;

/// Absolute severity of a diagnosis score against the nominal ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityCategory {
    Low,
    Moderate,
    High,
}

impl SeverityCategory {
    pub const fn label(self) -> &'static str {
        match self {
            SeverityCategory::Low => "low",
            SeverityCategory::Moderate => "moderate",
            SeverityCategory::High => "high",
        }
    }
}

/// Audit record of one strictly positive contribution to one diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributingFactor {
    pub diagnosis: Diagnosis,
    pub category: WeightCategory,
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub score: u32,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlag {
    pub flag: String,
    pub rationale: String,
}

/// Snapshot produced by finalizing one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    /// Per-diagnosis totals clamped at zero.
    pub raw_scores: BTreeMap<Diagnosis, u32>,
    /// Relative likelihood; sums to exactly 100 when any score is positive.
    pub probabilities: BTreeMap<Diagnosis, u32>,
    pub categories: BTreeMap<Diagnosis, SeverityCategory>,
    pub top_factors: BTreeMap<Diagnosis, Vec<ContributingFactor>>,
    /// Present only for diagnoses categorised moderate or high.
    pub recommendations: BTreeMap<Diagnosis, Vec<String>>,
    pub red_flags: Vec<RedFlag>,
    pub has_red_flags: bool,
}

impl ScoringResult {
    pub fn raw_score(&self, diagnosis: Diagnosis) -> u32 {
        self.raw_scores.get(&diagnosis).copied().unwrap_or(0)
    }

    pub fn probability(&self, diagnosis: Diagnosis) -> u32 {
        self.probabilities.get(&diagnosis).copied().unwrap_or(0)
    }

    pub fn category(&self, diagnosis: Diagnosis) -> SeverityCategory {
        self.categories
            .get(&diagnosis)
            .copied()
            .unwrap_or(SeverityCategory::Low)
    }

    pub fn top_factors_for(&self, diagnosis: Diagnosis) -> &[ContributingFactor] {
        self.top_factors
            .get(&diagnosis)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn recommendations_for(&self, diagnosis: Diagnosis) -> &[String] {
        self.recommendations
            .get(&diagnosis)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Diagnoses by descending probability; ties keep the fixed tag order.
    pub fn ranked(&self) -> Vec<Diagnosis> {
        let mut ranked = Diagnosis::ALL.to_vec();
        ranked.sort_by(|a, b| self.probability(*b).cmp(&self.probability(*a)));
        ranked
    }

    pub fn leading(&self) -> Option<Diagnosis> {
        if self.probabilities.values().all(|probability| *probability == 0) {
            return None;
        }
        self.ranked().first().copied()
    }
}
