//! Integration tests for [`HttpApplicationApi`] against a local axum server.
//!
//! Each test binds a throwaway router to `127.0.0.1:0` that plays the
//! job-application backend, then drives the real reqwest client at it.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use jobflow_client::{ApiError, ApplicationApi, ApplicationId, ClientConfig, HttpApplicationApi};

type Received = Arc<Mutex<Vec<(String, Value)>>>;

/// Start `router` on an ephemeral port and return a client pointed at it.
async fn serve(router: Router) -> HttpApplicationApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    HttpApplicationApi::new(ClientConfig::new(format!(
        "http://{addr}/api/job-applications"
    )))
    .unwrap()
}

fn definition() -> Value {
    json!({
        "workflowId": "job-application",
        "steps": [{
            "stepId": "personal",
            "stepName": "Personal",
            "description": "",
            "fields": [{ "fieldId": "fullName", "fieldName": "Full Name", "fieldType": "text", "required": true }]
        }]
    })
}

fn backend(received: Received) -> Router {
    Router::new()
        .route(
            "/api/job-applications/workflow-definition",
            get(|| async { Json(definition()) }),
        )
        .route(
            "/api/job-applications/start",
            post(|| async { Json(json!({ "applicationId": "APP-1", "status": "STARTED" })) }),
        )
        .route(
            "/api/job-applications/steps/{step_id}",
            get(|Path(step_id): Path<String>| async move {
                if step_id == "personal" {
                    Ok(Json(definition()["steps"][0].clone()))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        )
        .route(
            "/api/job-applications/{id}",
            get(|Path(id): Path<String>| async move {
                Json(json!({ "applicationId": id, "status": "COMPLETED" }))
            }),
        )
        .route(
            "/api/job-applications/{id}/step",
            post(
                |State(received): State<Received>,
                 Path(id): Path<String>,
                 Json(body): Json<Value>| async move {
                    let reject = body.get("fullName") == Some(&json!("reject me"));
                    received.lock().unwrap().push((id.clone(), body));
                    if reject {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "applicationId": id, "status": "VALIDATION_ERROR", "message": "Full Name is not acceptable" })),
                        )
                    } else {
                        (StatusCode::OK, Json(json!({ "ok": true })))
                    }
                },
            ),
        )
        .with_state(received)
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetches_definition_and_starts_session() {
    let api = serve(backend(Received::default())).await;

    let def = api.fetch_workflow_definition().await.unwrap();
    assert_eq!(def.step_count(), 1);
    assert_eq!(def.steps[0].fields[0].field_id, "fullName");

    let id = api.start_application().await.unwrap();
    assert_eq!(id, ApplicationId::new("APP-1"));
}

#[tokio::test]
async fn submit_step_posts_tagged_body() {
    let received = Received::default();
    let api = serve(backend(received.clone())).await;

    let mut body = serde_json::Map::new();
    body.insert("currentStep".into(), json!("personal"));
    body.insert("fullName".into(), json!("Jane Doe"));

    let resp = api
        .submit_step(&ApplicationId::new("APP-1"), &body)
        .await
        .unwrap();
    assert!(resp.message.is_none());

    let calls = received.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "APP-1");
    assert_eq!(calls[0].1, json!({ "currentStep": "personal", "fullName": "Jane Doe" }));
}

#[tokio::test]
async fn read_endpoints_parse_responses() {
    let api = serve(backend(Received::default())).await;

    let app = api.fetch_application(&ApplicationId::new("APP-9")).await.unwrap();
    assert_eq!(app.application_id, Some(ApplicationId::new("APP-9")));
    assert_eq!(app.status.as_deref(), Some("COMPLETED"));

    let step = api.fetch_step("personal").await.unwrap();
    assert_eq!(step.step_id, "personal");
}

#[tokio::test]
async fn definition_with_explicit_nulls_loads() {
    let router = Router::new().route(
        "/api/job-applications/workflow-definition",
        get(|| async {
            Json(json!({
                "workflowId": "job-application",
                "workflowName": "Job Application",
                "version": null,
                "description": null,
                "steps": [{
                    "stepId": "personal",
                    "stepName": "Personal",
                    "description": null,
                    "stepOrder": 1,
                    "fields": [{
                        "fieldId": "fullName",
                        "fieldName": "Full Name",
                        "fieldType": "text",
                        "required": true,
                        "placeholder": null,
                        "options": null,
                        "validation": null
                    }],
                    "conditionalFields": null
                }]
            }))
        }),
    );
    let api = serve(router).await;

    let def = api.fetch_workflow_definition().await.unwrap();
    let step = def.step(0).unwrap();
    assert_eq!(step.description, "");
    assert!(step.conditional_fields.is_empty());
    assert!(step.fields[0].options.is_empty());
    assert!(step.fields[0].required);
}

#[tokio::test]
async fn application_id_is_sent_as_one_path_segment() {
    let received = Received::default();
    let api = serve(backend(received.clone())).await;

    let mut body = serde_json::Map::new();
    body.insert("currentStep".into(), json!("personal"));
    api.submit_step(&ApplicationId::new("APP/1?x#y"), &body)
        .await
        .unwrap();

    let calls = received.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "APP/1?x#y");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_surfaces_server_message() {
    let api = serve(backend(Received::default())).await;

    let mut body = serde_json::Map::new();
    body.insert("fullName".into(), json!("reject me"));

    let err = api
        .submit_step(&ApplicationId::new("APP-1"), &body)
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Api { status: 400, .. });
    assert_eq!(err.user_message("Failed to submit step"), "Full Name is not acceptable");
}

#[tokio::test]
async fn not_found_without_body_uses_fallback() {
    let api = serve(backend(Received::default())).await;

    let err = api.fetch_step("missing").await.unwrap_err();
    assert_matches!(err, ApiError::Api { status: 404, message: None, .. });
    assert_eq!(err.user_message("Step unavailable"), "Step unavailable");
}

#[tokio::test]
async fn start_without_application_id_is_an_error() {
    let router = Router::new().route(
        "/api/job-applications/start",
        post(|| async { Json(json!({ "status": "ERROR" })) }),
    );
    let api = serve(router).await;

    assert_matches!(
        api.start_application().await,
        Err(ApiError::MissingField("applicationId"))
    );
}

#[tokio::test]
async fn malformed_definition_is_a_decode_error() {
    let router = Router::new().route(
        "/api/job-applications/workflow-definition",
        get(|| async { "not json" }),
    );
    let api = serve(router).await;

    assert_matches!(api.fetch_workflow_definition().await, Err(ApiError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpApplicationApi::new(ClientConfig::new(format!("http://{addr}"))).unwrap();
    assert_matches!(api.start_application().await, Err(ApiError::Request(_)));
}
