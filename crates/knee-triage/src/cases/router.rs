use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::CaseId;
use super::repository::{CaseRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};
use crate::scoring::{AssessmentReport, Questionnaire};

pub const DEFAULT_LISTING_LIMIT: usize = 20;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingQuery {
    pub(crate) limit: Option<usize>,
}

/// Router exposing scoring and case-history endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: CaseRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(assess_handler::<R>))
        .route(
            "/api/v1/cases",
            post(submit_handler::<R>).get(recent_handler::<R>),
        )
        .route("/api/v1/cases/:case_id", get(case_handler::<R>))
        .with_state(service)
}

pub(crate) async fn assess_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(questionnaire): axum::Json<Questionnaire>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let result = service.assess(&questionnaire);
    let payload = json!({
        "patientId": questionnaire.patient_label(),
        "report": AssessmentReport::from_result(&result, &service.config().severity),
        "result": result,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(questionnaire): axum::Json<Questionnaire>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.submit(questionnaire) {
        Ok(record) => {
            let payload = json!({
                "case": record.summary_view(),
                "report": record.report(&service.config().severity),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn recent_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LISTING_LIMIT);
    match service.recent(limit) {
        Ok(records) => {
            let cases: Vec<_> = records.iter().map(|record| record.summary_view()).collect();
            (StatusCode::OK, axum::Json(json!({ "cases": cases }))).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn case_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.get(&CaseId(case_id)) {
        Ok(record) => {
            let payload = json!({
                "case": record.summary_view(),
                "report": record.report(&service.config().severity),
                "record": record,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
