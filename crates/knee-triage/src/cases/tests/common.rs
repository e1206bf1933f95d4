use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::cases::domain::{CaseId, CaseRecord};
use crate::cases::repository::{CaseRepository, InMemoryCaseHistory, RepositoryError};
use crate::cases::{assessment_router, AssessmentService};
use crate::scoring::{Questionnaire, ScoringConfig};

pub(super) fn meniscus_questionnaire() -> Questionnaire {
    Questionnaire {
        patient_id: Some("PT-0042".to_string()),
        age: Some(55),
        knee_oa: true,
        pain_location: vec!["medialJointLine".to_string()],
        mc_murray_test: Some("positive".to_string()),
        ..Questionnaire::default()
    }
}

pub(super) fn red_flag_questionnaire() -> Questionnaire {
    Questionnaire {
        patient_id: Some("PT-0099".to_string()),
        rest_pain: true,
        fever: true,
        ..Questionnaire::default()
    }
}

pub(super) fn timestamp(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 9, 9, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn record(id: &str, patient: &str) -> CaseRecord {
    CaseRecord::new(
        CaseId::from(id),
        Questionnaire {
            patient_id: Some(patient.to_string()),
            ..Questionnaire::default()
        },
        None,
        timestamp(0),
    )
}

pub(super) fn build_service(
    limit: usize,
) -> (AssessmentService<InMemoryCaseHistory>, Arc<InMemoryCaseHistory>) {
    let repository = Arc::new(InMemoryCaseHistory::new(limit));
    let config = Arc::new(ScoringConfig::standard().clone());
    (AssessmentService::new(config, repository.clone()), repository)
}

pub(super) fn router_with_service(service: AssessmentService<InMemoryCaseHistory>) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Fresh path under the system temp dir; the file itself is not created.
pub(super) fn scratch_path(name: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir()
        .join(format!("knee-triage-{}-{unique}", std::process::id()))
        .join(name)
}

pub(super) struct UnavailableRepository;

impl CaseRepository for UnavailableRepository {
    fn save(&self, _record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch(&self, _id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}
