//! Differential-diagnosis scoring for knee-pain questionnaires.
//!
//! A [`ScoringEngine`] borrows an immutable [`ScoringConfig`], accumulates
//! per-diagnosis evidence over four passes (background, symptoms,
//! examination, imaging) and finalizes into a [`ScoringResult`].

mod diagnosis;
mod engine;
mod finalize;
mod imaging;
mod questionnaire;
mod report;
mod result;
mod table;
mod weights;

#[cfg(test)]
mod tests;

pub use diagnosis::Diagnosis;
pub use engine::{
    age_bracket, AccumulatorState, EnginePhase, ScoringEngine, HIGH_BMI_THRESHOLD,
    MIDDLE_AGE_LIMIT, YOUNG_AGE_LIMIT,
};
pub use finalize::{clamp_scores, probabilities, top_factors, TOP_FACTOR_LIMIT};
pub use imaging::{ImagingFinding, ImagingRoute, IMAGING_ROUTES};
pub use questionnaire::Questionnaire;
pub use report::{AssessmentReport, DiagnosisView, NO_RECOMMENDATIONS};
pub use result::{ContributingFactor, RedFlag, ScoringResult, SeverityCategory};
pub use weights::{
    CategoryWeights, ItemWeights, RecommendationTiers, RedFlagEntry, ScoringConfig, SeverityBand,
    SeverityBands, WeightCategory, WeightEntry, WeightTableError,
};
