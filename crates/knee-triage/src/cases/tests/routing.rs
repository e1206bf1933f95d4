use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::cases::router::case_handler;
use crate::cases::AssessmentService;
use crate::scoring::ScoringConfig;

fn json_request(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn assessment_route_scores_without_saving() {
    let (service, repository) = build_service(5);
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request("/api/v1/assessments", &meniscus_questionnaire()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["patientId"], "PT-0042");
    assert_eq!(payload["report"]["leading"][0], "meniscus");
    assert_eq!(payload["result"]["probabilities"]["meniscus"], 50);
    assert!(crate::cases::CaseRepository::recent(repository.as_ref(), 10)
        .expect("recent")
        .is_empty());
}

#[tokio::test]
async fn assessment_route_accepts_form_nulls_and_float_age() {
    let (service, _) = build_service(5);
    let router = router_with_service(service);
    let form = serde_json::json!({
        "patientId": "PT-0042",
        "age": 55.0,
        "kneeOA": true,
        "painLocation": ["medialJointLine"],
        "provocativeMovements": null,
        "mcMurrayTest": "positive",
        "fever": null,
        "mriMeniscus": null
    });

    let response = router
        .oneshot(json_request("/api/v1/assessments", &form))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result"]["probabilities"]["meniscus"], 50);
    assert_eq!(payload["result"]["hasRedFlags"], false);
}

#[tokio::test]
async fn case_route_creates_and_lists() {
    let (service, _) = build_service(5);
    let service = Arc::new(service);
    let router = crate::cases::assessment_router(service.clone());

    let response = router
        .clone()
        .oneshot(json_request("/api/v1/cases", &red_flag_questionnaire()))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    assert_eq!(created["case"]["patientId"], "PT-0099");
    assert_eq!(created["case"]["hasRedFlags"], true);
    assert_eq!(created["report"]["hasRedFlags"], true);

    service
        .submit(meniscus_questionnaire())
        .expect("second submission");

    let response = router
        .oneshot(
            Request::get("/api/v1/cases?limit=1")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let listing = read_json_body(response).await;
    let cases = listing["cases"].as_array().expect("cases array");
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["patientId"], "PT-0042");
    assert_eq!(cases[0]["leading"], "meniscus");
}

#[tokio::test]
async fn case_route_returns_not_found_for_unknown_id() {
    let (service, _) = build_service(5);
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/cases/CASE-20260309-0900-4242")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("CASE-20260309-0900-4242"));
}

#[tokio::test]
async fn case_handler_returns_stored_record() {
    let (service, _) = build_service(5);
    let service = Arc::new(service);
    let record = service
        .submit(meniscus_questionnaire())
        .expect("submission succeeds");

    let response = case_handler(State(service), Path(record.id.0.clone())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["record"]["id"], Value::from(record.id.0.clone()));
    assert_eq!(payload["record"]["questionnaire"]["kneeOA"], true);
    assert_eq!(payload["report"]["leading"][0], "meniscus");
}

#[tokio::test]
async fn submit_route_reports_repository_failure() {
    let service = AssessmentService::new(
        Arc::new(ScoringConfig::standard().clone()),
        Arc::new(UnavailableRepository),
    );
    let router = crate::cases::assessment_router(Arc::new(service));

    let response = router
        .oneshot(json_request("/api/v1/cases", &meniscus_questionnaire()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
