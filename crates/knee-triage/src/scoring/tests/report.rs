use super::common::{meniscus_case, red_flag_case, standard_engine};
use crate::scoring::{
    AssessmentReport, Diagnosis, Questionnaire, ScoringConfig, ScoringEngine, SeverityBands,
    NO_RECOMMENDATIONS,
};

fn bands() -> &'static SeverityBands {
    &ScoringConfig::standard().severity
}

#[test]
fn report_lists_every_diagnosis_ranked_by_probability() {
    let mut engine = standard_engine();
    let report = AssessmentReport::from_result(&engine.evaluate(&meniscus_case()), bands());

    assert_eq!(report.diagnoses.len(), 7);
    assert_eq!(
        report.leading,
        vec![
            Diagnosis::Meniscus,
            Diagnosis::Saphenous,
            Diagnosis::Pes,
            Diagnosis::Hoffa,
            Diagnosis::Pfps,
            Diagnosis::Plica,
            Diagnosis::Other,
        ]
    );

    let meniscus = report.view(Diagnosis::Meniscus).expect("meniscus view");
    assert_eq!(meniscus.probability_label, "50%");
    assert_eq!(meniscus.category_label, "High");
    assert_eq!(meniscus.top_factors.len(), 3);
    assert!(meniscus.top_factors[0].starts_with("+5 "));
}

#[test]
fn report_collects_recommendations_of_elevated_diagnoses() {
    let mut engine = standard_engine();
    let report = AssessmentReport::from_result(&engine.evaluate(&meniscus_case()), bands());

    assert_eq!(report.recommendations.len(), 4);
    assert_eq!(
        report.recommendations[0],
        "Repeat McMurray, Apley and Thessaly tests"
    );
}

#[test]
fn report_falls_back_when_nothing_is_elevated() {
    let answers = Questionnaire {
        pain_location: vec!["other".to_string()],
        ..Questionnaire::default()
    };
    let mut engine = standard_engine();
    let report = AssessmentReport::from_result(&engine.evaluate(&answers), bands());

    assert_eq!(report.leading[0], Diagnosis::Other);
    assert_eq!(report.recommendations, vec![NO_RECOMMENDATIONS.to_string()]);
}

#[test]
fn rendered_text_puts_red_flags_first() {
    let mut engine = standard_engine();
    let report = AssessmentReport::from_result(&engine.evaluate(&red_flag_case()), bands());
    let text = report.render_text();

    assert!(report.has_red_flags);
    assert!(text.starts_with("RED FLAGS"));
    assert!(text.contains("restPain"));
    assert!(text.contains(NO_RECOMMENDATIONS));
}

#[test]
fn rendered_text_omits_red_flag_section_when_clear() {
    let mut engine = standard_engine();
    let report = AssessmentReport::from_result(&engine.evaluate(&meniscus_case()), bands());
    let text = report.render_text();

    assert!(text.starts_with("Differential"));
    assert!(text.contains("MRI strongly recommended"));
}

#[test]
fn category_labels_follow_the_weight_table() {
    let mut config = ScoringConfig::standard().clone();
    config.severity.low.label = "Unlikely".to_string();
    config.severity.high.label = "Likely".to_string();

    let result = ScoringEngine::new(&config).evaluate(&meniscus_case());
    let report = AssessmentReport::from_result(&result, &config.severity);

    let meniscus = report.view(Diagnosis::Meniscus).expect("meniscus view");
    assert_eq!(meniscus.category_label, "Likely");
    let other = report.view(Diagnosis::Other).expect("other view");
    assert_eq!(other.category_label, "Unlikely");
    assert!(report.render_text().contains("Likely"));
}
