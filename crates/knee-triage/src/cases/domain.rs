use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{AssessmentReport, Diagnosis, Questionnaire, ScoringResult, SeverityBands};

static CASE_SEQUENCE: AtomicU32 = AtomicU32::new(1);

/// Identifier of a stored case, `CASE-YYYYMMDD-HHMM-NNNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub String);

impl CaseId {
    /// Minute-resolution timestamp plus a process-wide sequence so cases
    /// created within the same minute stay distinct.
    pub fn generate(at: DateTime<Utc>) -> Self {
        let sequence = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed) % 10_000;
        Self(format!("CASE-{}-{sequence:04}", at.format("%Y%m%d-%H%M")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CaseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A questionnaire together with its score, as kept in case history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: CaseId,
    pub patient_id: String,
    pub created_at: DateTime<Utc>,
    pub questionnaire: Questionnaire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoringResult>,
}

impl CaseRecord {
    pub fn new(
        id: CaseId,
        questionnaire: Questionnaire,
        result: Option<ScoringResult>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            patient_id: questionnaire.patient_label(),
            created_at,
            questionnaire,
            result,
        }
    }

    pub fn report(&self, bands: &SeverityBands) -> Option<AssessmentReport> {
        self.result
            .as_ref()
            .map(|result| AssessmentReport::from_result(result, bands))
    }

    pub fn summary_view(&self) -> CaseSummaryView {
        let leading = self.result.as_ref().and_then(ScoringResult::leading);
        CaseSummaryView {
            case_id: self.id.clone(),
            patient_id: self.patient_id.clone(),
            created_on: self.created_at.date_naive(),
            leading,
            leading_name: leading.map(|diagnosis| diagnosis.display_name().to_string()),
            leading_probability: match (&self.result, leading) {
                (Some(result), Some(diagnosis)) => Some(result.probability(diagnosis)),
                _ => None,
            },
            has_red_flags: self
                .result
                .as_ref()
                .map(|result| result.has_red_flags)
                .unwrap_or(false),
        }
    }
}

/// History-list row for a stored case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummaryView {
    pub case_id: CaseId,
    pub patient_id: String,
    pub created_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading: Option<Diagnosis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_probability: Option<u32>,
    pub has_red_flags: bool,
}
