use serde::{Deserialize, Serialize};

use super::diagnosis::Diagnosis;
use super::result::{RedFlag, ScoringResult, SeverityCategory};
use super::weights::SeverityBands;

pub const NO_RECOMMENDATIONS: &str =
    "No further evaluation is recommended; every candidate diagnosis is unlikely.";

/// Display-ready rendering of a [`ScoringResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub diagnoses: Vec<DiagnosisView>,
    pub leading: Vec<Diagnosis>,
    pub recommendations: Vec<String>,
    pub red_flags: Vec<RedFlag>,
    pub has_red_flags: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisView {
    pub diagnosis: Diagnosis,
    pub name: String,
    pub raw_score: u32,
    pub probability: u32,
    pub probability_label: String,
    pub category: SeverityCategory,
    pub category_label: String,
    pub top_factors: Vec<String>,
}

impl AssessmentReport {
    /// Category labels come from `bands`, so a weight-table override can rename them.
    pub fn from_result(result: &ScoringResult, bands: &SeverityBands) -> Self {
        let diagnoses = Diagnosis::ALL
            .into_iter()
            .map(|diagnosis| {
                let category = result.category(diagnosis);
                DiagnosisView {
                    diagnosis,
                    name: diagnosis.display_name().to_string(),
                    raw_score: result.raw_score(diagnosis),
                    probability: result.probability(diagnosis),
                    probability_label: format!("{}%", result.probability(diagnosis)),
                    category,
                    category_label: bands.label(category).to_string(),
                    top_factors: result
                        .top_factors_for(diagnosis)
                        .iter()
                        .map(|factor| format!("+{} {}", factor.score, factor.rationale))
                        .collect(),
                }
            })
            .collect();

        let leading = result.ranked();

        let mut recommendations: Vec<String> = leading
            .iter()
            .flat_map(|diagnosis| result.recommendations_for(*diagnosis).iter().cloned())
            .collect();
        if recommendations.is_empty() {
            recommendations.push(NO_RECOMMENDATIONS.to_string());
        }

        Self {
            diagnoses,
            leading,
            recommendations,
            red_flags: result.red_flags.clone(),
            has_red_flags: result.has_red_flags,
        }
    }

    pub fn view(&self, diagnosis: Diagnosis) -> Option<&DiagnosisView> {
        self.diagnoses.iter().find(|view| view.diagnosis == diagnosis)
    }

    /// Plain-text rendering for terminals and logs.
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        if self.has_red_flags {
            lines.push("RED FLAGS".to_string());
            for flag in &self.red_flags {
                lines.push(format!("  ! {}: {}", flag.flag, flag.rationale));
            }
        }
        lines.push("Differential".to_string());
        for diagnosis in &self.leading {
            let Some(view) = self.view(*diagnosis) else {
                continue;
            };
            lines.push(format!(
                "  {:<30} {:>4}  {:<8} (score {})",
                view.name, view.probability_label, view.category_label, view.raw_score
            ));
            for factor in &view.top_factors {
                lines.push(format!("      {factor}"));
            }
        }
        lines.push("Recommendations".to_string());
        for recommendation in &self.recommendations {
            lines.push(format!("  - {recommendation}"));
        }
        lines.join("\n")
    }
}
