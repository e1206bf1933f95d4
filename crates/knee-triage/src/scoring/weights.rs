use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::diagnosis::Diagnosis;
use super::result::SeverityCategory;
use super::table;

/// Per-diagnosis point values for one piece of clinical evidence.
///
/// Tags missing from `weights` contribute nothing; they are not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightEntry {
    #[serde(default)]
    pub weights: BTreeMap<Diagnosis, i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl WeightEntry {
    pub fn weight(&self, diagnosis: Diagnosis) -> i32 {
        self.weights.get(&diagnosis).copied().unwrap_or(0)
    }
}

/// Shape of a questionnaire item, fixed when the table is built.
///
/// `Direct` items are presence/absence findings; `Variants` items carry
/// mutually exclusive states such as `positive`/`negative`/`notDone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemWeights {
    Direct(WeightEntry),
    Variants(BTreeMap<String, WeightEntry>),
}

impl ItemWeights {
    /// Direct items answer only variant-less lookups and variant items only
    /// lookups naming a known variant. Anything else is no contribution.
    pub fn resolve(&self, variant: Option<&str>) -> Option<&WeightEntry> {
        match (self, variant) {
            (ItemWeights::Direct(entry), None) => Some(entry),
            (ItemWeights::Variants(variants), Some(variant)) => variants.get(variant),
            _ => None,
        }
    }
}

pub type CategoryWeights = BTreeMap<String, ItemWeights>;

/// Item groups that carry diagnosis weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeightCategory {
    Background,
    PainLocation,
    ProvocativeMovements,
    SymptomCharacter,
    Palpation,
    ManualTests,
    Imaging,
}

impl WeightCategory {
    pub const ALL: [WeightCategory; 7] = [
        WeightCategory::Background,
        WeightCategory::PainLocation,
        WeightCategory::ProvocativeMovements,
        WeightCategory::SymptomCharacter,
        WeightCategory::Palpation,
        WeightCategory::ManualTests,
        WeightCategory::Imaging,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            WeightCategory::Background => "background",
            WeightCategory::PainLocation => "painLocation",
            WeightCategory::ProvocativeMovements => "provocativeMovements",
            WeightCategory::SymptomCharacter => "symptomCharacter",
            WeightCategory::Palpation => "palpation",
            WeightCategory::ManualTests => "manualTests",
            WeightCategory::Imaging => "imaging",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlagEntry {
    pub is_red_flag: bool,
    pub rationale: String,
}

/// Inclusive percentage range of a severity band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBand {
    pub min: u32,
    pub max: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBands {
    pub low: SeverityBand,
    pub moderate: SeverityBand,
    pub high: SeverityBand,
}

impl SeverityBands {
    /// Classifies `score / max_score * 100` against the band maxima.
    ///
    /// Compared in integers (`score * 100 <= max * max_score`) so the 30% and
    /// 70% boundaries are exact. Ratios above 100 still land in `High`.
    pub fn classify(&self, score: u32, max_score: u32) -> SeverityCategory {
        let scaled = u64::from(score) * 100;
        let max_score = u64::from(max_score);
        if scaled <= u64::from(self.low.max) * max_score {
            SeverityCategory::Low
        } else if scaled <= u64::from(self.moderate.max) * max_score {
            SeverityCategory::Moderate
        } else {
            SeverityCategory::High
        }
    }

    pub fn label(&self, category: SeverityCategory) -> &str {
        match category {
            SeverityCategory::Low => &self.low.label,
            SeverityCategory::Moderate => &self.moderate.label,
            SeverityCategory::High => &self.high.label,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationTiers {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub moderate: Vec<String>,
}

/// Immutable weight table shared by every scoring request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Nominal per-diagnosis ceiling. Used for severity bands only.
    pub max_score: u32,
    #[serde(rename = "categories")]
    pub severity: SeverityBands,
    #[serde(default)]
    pub background: CategoryWeights,
    #[serde(default)]
    pub pain_location: CategoryWeights,
    #[serde(default)]
    pub provocative_movements: CategoryWeights,
    #[serde(default)]
    pub red_flags: BTreeMap<String, RedFlagEntry>,
    #[serde(default)]
    pub symptom_character: CategoryWeights,
    #[serde(default)]
    pub palpation: CategoryWeights,
    #[serde(default)]
    pub manual_tests: CategoryWeights,
    #[serde(default)]
    pub imaging: CategoryWeights,
    #[serde(default)]
    pub recommendations: BTreeMap<Diagnosis, RecommendationTiers>,
}

static STANDARD: OnceLock<ScoringConfig> = OnceLock::new();

impl ScoringConfig {
    /// Built-in weight table, constructed on first use.
    pub fn standard() -> &'static ScoringConfig {
        STANDARD.get_or_init(table::standard_table)
    }

    /// Resolves the table for a process: an override file when configured,
    /// the built-in table otherwise.
    pub fn load(path: Option<&Path>) -> Result<Arc<ScoringConfig>, WeightTableError> {
        match path {
            Some(path) => Self::from_json_file(path).map(Arc::new),
            None => Ok(Arc::new(Self::standard().clone())),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, WeightTableError> {
        let raw = fs::read_to_string(path).map_err(|source| WeightTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), "loaded weight table override");
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, WeightTableError> {
        let config: ScoringConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WeightTableError> {
        if self.max_score == 0 {
            return Err(WeightTableError::InvalidMaxScore);
        }
        let bands = &self.severity;
        if bands.low.max >= bands.moderate.max || bands.moderate.max >= bands.high.max {
            return Err(WeightTableError::InvalidSeverityBands {
                low: bands.low.max,
                moderate: bands.moderate.max,
                high: bands.high.max,
            });
        }
        Ok(())
    }

    pub fn category(&self, category: WeightCategory) -> &CategoryWeights {
        match category {
            WeightCategory::Background => &self.background,
            WeightCategory::PainLocation => &self.pain_location,
            WeightCategory::ProvocativeMovements => &self.provocative_movements,
            WeightCategory::SymptomCharacter => &self.symptom_character,
            WeightCategory::Palpation => &self.palpation,
            WeightCategory::ManualTests => &self.manual_tests,
            WeightCategory::Imaging => &self.imaging,
        }
    }

    pub fn lookup(
        &self,
        category: WeightCategory,
        item: &str,
        variant: Option<&str>,
    ) -> Option<&WeightEntry> {
        self.category(category).get(item)?.resolve(variant)
    }

    /// String-keyed lookup; unknown category names yield no contribution.
    pub fn lookup_key(
        &self,
        category: &str,
        item: &str,
        variant: Option<&str>,
    ) -> Option<&WeightEntry> {
        self.lookup(WeightCategory::from_key(category)?, item, variant)
    }

    pub fn red_flag(&self, flag: &str) -> Option<&RedFlagEntry> {
        self.red_flags.get(flag)
    }

    pub fn recommendations_for(
        &self,
        diagnosis: Diagnosis,
        category: SeverityCategory,
    ) -> &[String] {
        let Some(tiers) = self.recommendations.get(&diagnosis) else {
            return &[];
        };
        match category {
            SeverityCategory::High => tiers.high.as_slice(),
            SeverityCategory::Moderate => tiers.moderate.as_slice(),
            SeverityCategory::Low => &[],
        }
    }
}

/// Failure to build a weight table from an override file.
#[derive(Debug, thiserror::Error)]
pub enum WeightTableError {
    #[error("unable to read weight table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed weight table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("maxScore must be greater than zero")]
    InvalidMaxScore,
    #[error("severity band maxima must increase (low {low}, moderate {moderate}, high {high})")]
    InvalidSeverityBands { low: u32, moderate: u32, high: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pairs: &[(Diagnosis, i32)]) -> WeightEntry {
        WeightEntry {
            weights: pairs.iter().copied().collect(),
            rationale: None,
        }
    }

    #[test]
    fn direct_items_ignore_variant_lookups() {
        let item = ItemWeights::Direct(entry(&[(Diagnosis::Pes, 2)]));
        assert!(item.resolve(None).is_some());
        assert!(item.resolve(Some("positive")).is_none());
    }

    #[test]
    fn variant_items_need_a_known_variant() {
        let mut variants = BTreeMap::new();
        variants.insert("positive".to_string(), entry(&[(Diagnosis::Meniscus, 5)]));
        let item = ItemWeights::Variants(variants);

        assert_eq!(
            item.resolve(Some("positive")).map(|e| e.weight(Diagnosis::Meniscus)),
            Some(5)
        );
        assert!(item.resolve(Some("equivocal")).is_none());
        assert!(item.resolve(None).is_none());
    }

    #[test]
    fn missing_tags_weigh_zero() {
        let entry = entry(&[(Diagnosis::Hoffa, 4)]);
        assert_eq!(entry.weight(Diagnosis::Hoffa), 4);
        assert_eq!(entry.weight(Diagnosis::Other), 0);
    }

    #[test]
    fn severity_boundaries_are_inclusive() {
        let bands = &ScoringConfig::standard().severity;
        assert_eq!(bands.classify(0, 20), SeverityCategory::Low);
        assert_eq!(bands.classify(6, 20), SeverityCategory::Low);
        assert_eq!(bands.classify(7, 20), SeverityCategory::Moderate);
        assert_eq!(bands.classify(14, 20), SeverityCategory::Moderate);
        assert_eq!(bands.classify(15, 20), SeverityCategory::High);
        assert_eq!(bands.classify(45, 20), SeverityCategory::High);
    }

    #[test]
    fn standard_table_survives_json_round_trip() {
        let standard = ScoringConfig::standard();
        let json = serde_json::to_string(standard).expect("table serializes");
        let parsed = ScoringConfig::from_json_str(&json).expect("table parses");
        assert_eq!(&parsed, standard);
    }

    #[test]
    fn rejects_zero_max_score() {
        let mut config = ScoringConfig::standard().clone();
        config.max_score = 0;
        let json = serde_json::to_string(&config).expect("serializes");
        let err = ScoringConfig::from_json_str(&json).expect_err("zero max score rejected");
        assert!(matches!(err, WeightTableError::InvalidMaxScore));
    }

    #[test]
    fn rejects_unordered_severity_bands() {
        let mut config = ScoringConfig::standard().clone();
        config.severity.moderate.max = 20;
        let err = config.validate().expect_err("bands out of order");
        assert!(matches!(
            err,
            WeightTableError::InvalidSeverityBands { low: 30, moderate: 20, .. }
        ));
    }

    #[test]
    fn unknown_category_key_yields_no_entry() {
        let config = ScoringConfig::standard();
        assert!(config.lookup_key("gait", "antalgic", None).is_none());
        assert!(config.lookup_key("palpation", "plicaPalpation", None).is_some());
    }

    #[test]
    fn load_without_path_uses_standard_table() {
        let loaded = ScoringConfig::load(None).expect("standard table loads");
        assert_eq!(loaded.as_ref(), ScoringConfig::standard());
    }

    #[test]
    fn load_reports_missing_override_file() {
        let err = ScoringConfig::load(Some(Path::new("/nonexistent/knee-weights.json")))
            .expect_err("missing file");
        assert!(matches!(err, WeightTableError::Io { .. }));
    }
}
