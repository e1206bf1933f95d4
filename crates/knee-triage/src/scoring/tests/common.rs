use crate::scoring::{
    Diagnosis, ItemWeights, Questionnaire, ScoringConfig, ScoringEngine, WeightEntry,
};

pub(super) fn standard_engine() -> ScoringEngine<'static> {
    ScoringEngine::new(ScoringConfig::standard())
}

/// Age 55 with knee OA, medial joint-line pain and a positive McMurray test.
pub(super) fn meniscus_case() -> Questionnaire {
    Questionnaire {
        patient_id: Some("PT-0042".to_string()),
        age: Some(55),
        knee_oa: true,
        pain_location: vec!["medialJointLine".to_string()],
        catching_clicking: false,
        mc_murray_test: Some("positive".to_string()),
        ..Questionnaire::default()
    }
}

pub(super) fn red_flag_case() -> Questionnaire {
    Questionnaire {
        rest_pain: true,
        night_pain: true,
        ..Questionnaire::default()
    }
}

/// Standard table extended with extra pain-location items carrying the
/// given weights, so tests can place totals on exact boundaries.
pub(super) fn weighted_config(items: &[(&str, &[(Diagnosis, i32)])]) -> ScoringConfig {
    let mut config = ScoringConfig::standard().clone();
    for (item, weights) in items {
        config.pain_location.insert(
            item.to_string(),
            ItemWeights::Direct(WeightEntry {
                weights: weights.iter().copied().collect(),
                rationale: Some(format!("extra {item}")),
            }),
        );
    }
    config
}
