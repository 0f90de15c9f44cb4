//! End-to-end tests for the prediction API, exercising the real router with
//! stub classifiers substituted for the trained model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use diapred::api::types::RESULT_LABEL;
use diapred::api::{create_router, AppState};
use diapred::error::Result;
use diapred::features::FeatureRow;
use diapred::ml::Classifier;

/// Returns a fixed label for every row and counts invocations.
struct ConstantClassifier {
    label: i64,
    calls: AtomicUsize,
}

impl ConstantClassifier {
    fn new(label: i64) -> Arc<Self> {
        Arc::new(Self {
            label,
            calls: AtomicUsize::new(0),
        })
    }
}

impl Classifier for ConstantClassifier {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<i64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.label; rows.len()])
    }
}

/// Labels each row with its Glucose value, making outputs distinguishable.
struct GlucoseEcho;

impl Classifier for GlucoseEcho {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<i64>> {
        Ok(rows.iter().map(|r| r.glucose).collect())
    }
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _rows: &[FeatureRow]) -> Result<Vec<i64>> {
        Err(diapred::ServiceError::Internal(
            "unexpected input shape".to_string(),
        ))
    }
}

fn app(model: Arc<dyn Classifier>) -> Router {
    create_router(AppState::new(model))
}

fn record(glucose: i64) -> Value {
    json!({
        "Pregnancies": 2,
        "Glucose": glucose,
        "BloodPressure": 70,
        "SkinThickness": 20,
        "Insulin": 85,
        "BMI": 28.5,
        "DiabetesPedigreeFunction": 0.4,
        "Age": 35,
    })
}

async fn post_prediction(app: &Router, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/diabetesPrediction")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn single_record_end_to_end() {
    let app = app(ConstantClassifier::new(1));
    let body = json!({ "data": [record(130)] }).to_string();

    let (status, value) = post_prediction(&app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!([{ RESULT_LABEL: 1 }]));
}

#[tokio::test]
async fn output_length_and_order_match_input() {
    let app = app(Arc::new(GlucoseEcho));
    let body = json!({ "data": [record(101), record(57), record(243)] }).to_string();

    let (status, value) = post_prediction(&app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value,
        json!([
            { RESULT_LABEL: 101 },
            { RESULT_LABEL: 57 },
            { RESULT_LABEL: 243 },
        ])
    );
}

#[tokio::test]
async fn extra_fields_do_not_affect_prediction() {
    let app = app(Arc::new(GlucoseEcho));

    let mut extra = record(140);
    extra["TemplateID"] = json!("tmpl-7");
    extra["Notes"] = json!({ "free": "text" });

    let (_, plain) = post_prediction(&app, json!({ "data": [record(140)] }).to_string()).await;
    let (status, with_extra) = post_prediction(&app, json!({ "data": [extra] }).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(with_extra, plain);
}

#[tokio::test]
async fn each_missing_field_is_a_bad_request() {
    let fields = [
        "Pregnancies",
        "Glucose",
        "BloodPressure",
        "SkinThickness",
        "Insulin",
        "BMI",
        "DiabetesPedigreeFunction",
        "Age",
    ];
    let app = app(ConstantClassifier::new(0));

    for field in fields {
        let mut rec = record(130);
        rec.as_object_mut().unwrap().remove(field);
        let (status, value) = post_prediction(&app, json!({ "data": [rec] }).to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "field {field}");
        assert_eq!(value["error"], "input_format", "field {field}");
        assert!(
            value["message"].as_str().unwrap().contains(field),
            "message should name {field}: {value}"
        );
    }
}

#[tokio::test]
async fn non_numeric_glucose_is_unprocessable() {
    let app = app(ConstantClassifier::new(0));
    let mut rec = record(130);
    rec["Glucose"] = json!("abc");

    let (status, value) = post_prediction(&app, json!({ "data": [rec] }).to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(value["error"], "type_coercion");
}

#[tokio::test]
async fn string_bmi_is_coerced() {
    let app = app(ConstantClassifier::new(1));
    let mut rec = record(130);
    rec["BMI"] = json!("12.5");

    let (status, value) = post_prediction(&app, json!({ "data": [rec] }).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!([{ RESULT_LABEL: 1 }]));
}

#[tokio::test]
async fn empty_batch_skips_the_model() {
    let model = ConstantClassifier::new(1);
    let app = app(model.clone());

    let (status, value) = post_prediction(&app, json!({ "data": [] }).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!([]));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn model_is_invoked_once_per_request() {
    let model = ConstantClassifier::new(0);
    let app = app(model.clone());
    let body = json!({ "data": [record(1), record(2), record(3)] }).to_string();

    let (status, _) = post_prediction(&app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn identical_requests_yield_identical_output() {
    let app = app(Arc::new(GlucoseEcho));
    let body = json!({ "data": [record(99), record(188)] }).to_string();

    let (status_a, first) = post_prediction(&app, body.clone()).await;
    let (status_b, second) = post_prediction(&app, body).await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn malformed_body_is_a_client_error_and_service_survives() {
    let app = app(ConstantClassifier::new(1));

    let (status, value) = post_prediction(&app, "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], "input_format");

    // Process is unaffected; the next request succeeds.
    let (status, value) = post_prediction(&app, json!({ "data": [record(130)] }).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!([{ RESULT_LABEL: 1 }]));
}

#[tokio::test]
async fn missing_data_key_is_a_bad_request() {
    let app = app(ConstantClassifier::new(1));

    let (status, value) = post_prediction(&app, json!({ "rows": [] }).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], "input_format");
}

#[tokio::test]
async fn model_failure_is_an_internal_error() {
    let app = app(Arc::new(FailingClassifier));

    let (status, value) = post_prediction(&app, json!({ "data": [record(130)] }).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["error"], "model_inference");
}

#[tokio::test]
async fn liveness_probe_responds() {
    let app = app(ConstantClassifier::new(0));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_probe_reports_uptime() {
    let app = app(ConstantClassifier::new(0));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], "ok");
    assert!(value["uptime_seconds"].as_i64().unwrap() >= 0);
}
