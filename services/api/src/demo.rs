use crate::infra::load_scoring_config;
use clap::Args;
use knee_triage::cases::{AssessmentService, CaseRepository, InMemoryCaseHistory};
use knee_triage::config::ScoringSettings;
use knee_triage::error::AppError;
use knee_triage::scoring::{AssessmentReport, Questionnaire, ScoringEngine};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Questionnaire JSON file using the intake form's field names
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the result and report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Weight table override (defaults to KNEE_WEIGHT_TABLE, then the built-in table)
    #[arg(long)]
    pub(crate) weight_table: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only print the case-history summary for the sample cases
    #[arg(long)]
    pub(crate) summary_only: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        json: as_json,
        weight_table,
    } = args;

    let settings = scoring_settings_from_env();
    let config = load_scoring_config(weight_table.as_deref(), &settings)?;

    let raw = std::fs::read_to_string(&input)?;
    let questionnaire: Questionnaire = serde_json::from_str(&raw).map_err(io::Error::from)?;

    let result = ScoringEngine::new(&config).evaluate(&questionnaire);
    let report = AssessmentReport::from_result(&result, &config.severity);

    if as_json {
        let payload = json!({
            "patientId": questionnaire.patient_label(),
            "report": report,
            "result": result,
        });
        let rendered = serde_json::to_string_pretty(&payload).map_err(io::Error::from)?;
        println!("{rendered}");
    } else {
        println!("Patient: {}", questionnaire.patient_label());
        println!("{}", report.render_text());
    }

    Ok(())
}

/// Scoring variables only; `score` and `demo` never bind a server.
fn scoring_settings_from_env() -> ScoringSettings {
    dotenvy::dotenv().ok();
    ScoringSettings {
        weight_table: std::env::var("KNEE_WEIGHT_TABLE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from),
        ..ScoringSettings::default()
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let settings = scoring_settings_from_env();
    let config = load_scoring_config(None, &settings)?;
    let history = Arc::new(InMemoryCaseHistory::new(settings.history_limit));
    let service = AssessmentService::new(config, history.clone());

    println!("Knee triage demo");
    for (title, questionnaire) in sample_cases() {
        let record = service.submit(questionnaire)?;
        if args.summary_only {
            continue;
        }
        println!("\n== {title} ({}) ==", record.id);
        if let Some(report) = record.report(&service.config().severity) {
            println!("{}", report.render_text());
        }
    }

    println!("\nCase history (most recent first)");
    for record in history.recent(settings.history_limit)? {
        let view = record.summary_view();
        let leading = match (&view.leading_name, view.leading_probability) {
            (Some(name), Some(probability)) => format!("{name} {probability}%"),
            _ => "no positive findings".to_string(),
        };
        let flag = if view.has_red_flags { " [RED FLAG]" } else { "" };
        println!(
            "- {} | {} | {} | {}{}",
            view.case_id, view.patient_id, view.created_on, leading, flag
        );
    }

    Ok(())
}

pub(crate) fn sample_cases() -> Vec<(&'static str, Questionnaire)> {
    vec![
        (
            "Degenerative medial meniscus tear",
            Questionnaire {
                patient_id: Some("DEMO-001".to_string()),
                age: Some(58),
                height_cm: Some(158.0),
                weight_kg: Some(66.0),
                knee_oa: true,
                pain_location: vec!["medialJointLine".to_string()],
                provocative_movements: vec!["twistingPivot".to_string(), "deepSquat".to_string()],
                catching_clicking: true,
                joint_line_tenderness: true,
                mc_murray_test: Some("positive".to_string()),
                thessaly_test: Some("positive".to_string()),
                mri_meniscus: true,
                ..Questionnaire::default()
            },
        ),
        (
            "Patellofemoral pain in a young runner",
            Questionnaire {
                patient_id: Some("DEMO-002".to_string()),
                age: Some(22),
                sports_activity: Some("recreational".to_string()),
                pain_location: vec!["anteriorKnee".to_string()],
                provocative_movements: vec![
                    "stairDescending".to_string(),
                    "theaterSign".to_string(),
                ],
                squat_pain: true,
                patellar_facet_tenderness: true,
                clarke_test: Some("positive".to_string()),
                ..Questionnaire::default()
            },
        ),
        (
            "Pes anserine bursitis",
            Questionnaire {
                patient_id: Some("DEMO-003".to_string()),
                age: Some(64),
                bmi: Some(29.4),
                pain_location: vec!["tibialMedial".to_string()],
                provocative_movements: vec!["stairClimbing".to_string()],
                tibial_tenderness: Some("marked".to_string()),
                valgus_stress: Some("negative".to_string()),
                us_pes_bursa: true,
                ..Questionnaire::default()
            },
        ),
        (
            "Night pain with fever",
            Questionnaire {
                patient_id: Some("DEMO-004".to_string()),
                age: Some(41),
                night_pain: true,
                fever: true,
                severe_swelling: true,
                pain_location: vec!["other".to_string()],
                ..Questionnaire::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use knee_triage::scoring::{Diagnosis, ScoringConfig};

    #[test]
    fn sample_cases_lead_with_their_titled_diagnosis() {
        let expected = [
            Some(Diagnosis::Meniscus),
            Some(Diagnosis::Pfps),
            Some(Diagnosis::Pes),
            Some(Diagnosis::Other),
        ];
        for ((title, questionnaire), leading) in sample_cases().into_iter().zip(expected) {
            let result = ScoringEngine::new(ScoringConfig::standard()).evaluate(&questionnaire);
            assert_eq!(result.leading(), leading, "{title}");
        }
    }

    #[test]
    fn febrile_sample_raises_red_flags() {
        let (_, questionnaire) = sample_cases().pop().expect("sample present");
        let result = ScoringEngine::new(ScoringConfig::standard()).evaluate(&questionnaire);
        assert_eq!(result.red_flags.len(), 3);
    }

    #[test]
    fn score_reads_questionnaire_file() {
        let path = std::env::temp_dir().join(format!("knee-score-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "painLocation": ["medialJointLine"] }"#).expect("write input");

        let outcome = run_score(ScoreArgs {
            input: path.clone(),
            json: true,
            weight_table: None,
        });
        let _ = std::fs::remove_file(&path);
        assert!(outcome.is_ok());
    }

    #[test]
    fn score_rejects_malformed_questionnaire() {
        let path = std::env::temp_dir().join(format!("knee-bad-{}.json", std::process::id()));
        std::fs::write(&path, "[1, 2").expect("write input");

        let outcome = run_score(ScoreArgs {
            input: path.clone(),
            json: false,
            weight_table: None,
        });
        let _ = std::fs::remove_file(&path);
        assert!(matches!(outcome, Err(AppError::Io(_))));
    }
}
