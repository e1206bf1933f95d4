use super::common::{meniscus_case, standard_engine};
use crate::scoring::{Diagnosis, Questionnaire, SeverityCategory};

#[test]
fn meniscus_case_probabilities_sum_to_one_hundred() {
    let mut engine = standard_engine();
    let result = engine.evaluate(&meniscus_case());

    let expected = [
        (Diagnosis::Pes, 13),
        (Diagnosis::Pfps, 7),
        (Diagnosis::Plica, 3),
        (Diagnosis::Hoffa, 10),
        (Diagnosis::Meniscus, 50),
        (Diagnosis::Saphenous, 17),
        (Diagnosis::Other, 0),
    ];
    for (diagnosis, share) in expected {
        assert_eq!(result.probability(diagnosis), share, "{diagnosis}");
    }
    assert_eq!(result.probabilities.values().sum::<u32>(), 100);
    assert_eq!(result.leading(), Some(Diagnosis::Meniscus));
}

#[test]
fn meniscus_case_categories_use_nominal_ceiling() {
    let mut engine = standard_engine();
    let result = engine.evaluate(&meniscus_case());

    assert_eq!(result.category(Diagnosis::Meniscus), SeverityCategory::High);
    for diagnosis in Diagnosis::ALL {
        if diagnosis != Diagnosis::Meniscus {
            assert_eq!(result.category(diagnosis), SeverityCategory::Low, "{diagnosis}");
        }
    }
}

#[test]
fn recommendations_only_cover_elevated_diagnoses() {
    let mut engine = standard_engine();
    let result = engine.evaluate(&meniscus_case());

    assert_eq!(result.recommendations.len(), 1);
    let lines = result.recommendations_for(Diagnosis::Meniscus);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "MRI strongly recommended");
    assert!(result.recommendations_for(Diagnosis::Saphenous).is_empty());
}

#[test]
fn catch_all_location_is_certain_but_low() {
    let answers = Questionnaire {
        pain_location: vec!["other".to_string()],
        ..Questionnaire::default()
    };
    let mut engine = standard_engine();
    let result = engine.evaluate(&answers);

    assert_eq!(result.raw_score(Diagnosis::Other), 3);
    assert_eq!(result.probability(Diagnosis::Other), 100);
    assert_eq!(result.category(Diagnosis::Other), SeverityCategory::Low);
    assert!(result.recommendations.is_empty());
}

#[test]
fn every_diagnosis_has_an_entry() {
    let mut engine = standard_engine();
    let result = engine.evaluate(&Questionnaire::default());

    for diagnosis in Diagnosis::ALL {
        assert!(result.raw_scores.contains_key(&diagnosis));
        assert!(result.probabilities.contains_key(&diagnosis));
        assert!(result.categories.contains_key(&diagnosis));
        assert!(result.top_factors.contains_key(&diagnosis));
    }
}

#[test]
fn result_serializes_camel_case_fields_with_lowercase_tags() {
    let mut engine = standard_engine();
    let result = engine.evaluate(&meniscus_case());
    let json = serde_json::to_value(&result).expect("serialize result");

    assert_eq!(json["rawScores"]["meniscus"], 15);
    assert_eq!(json["categories"]["meniscus"], "high");
    assert_eq!(json["hasRedFlags"], false);
    assert_eq!(json["topFactors"]["meniscus"][0]["score"], 5);
    assert!(json.get("raw_scores").is_none());
    assert!(json.get("has_red_flags").is_none());
}
