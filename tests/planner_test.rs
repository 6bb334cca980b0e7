use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use url::Url;

use safeko::planner::{GeminiPlanner, PlanRequest, Planner, PlannerError, TravelStyle};

const MODEL: &str = "test-model";
const API_KEY: &str = "test-key";

/// Serve `text` as the first candidate part, after checking the API key header.
async fn spawn_gemini(text: &'static str, status: StatusCode) -> Url {
    let app = Router::new().route(
        "/v1beta/models/test-model:generateContent",
        post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
            if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
                return (StatusCode::FORBIDDEN, Json(json!({ "error": "bad key" })));
            }
            assert!(body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Jeju"));
            assert_eq!(
                body["generationConfig"]["responseMimeType"],
                "application/json"
            );
            let payload = json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            });
            (status, Json(payload))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}

fn planner(endpoint: Url, api_key: &str) -> GeminiPlanner {
    GeminiPlanner::new(
        endpoint,
        MODEL,
        Some(api_key.to_string()),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn jeju() -> PlanRequest {
    PlanRequest {
        destination: "Jeju".to_string(),
        duration: "2 Days".to_string(),
        style: TravelStyle::Adventure,
        budget: Some("Budget".to_string()),
    }
}

const PLAN: &str = r#"{
    "summary": "Volcanic hikes and sea views",
    "estimatedCost": "$300 - $450",
    "itinerary": [
        {
            "day": 1,
            "title": "Hallasan",
            "activities": [
                {"time": "06:00 AM", "activity": "Seongpanak trail", "description": "Summit before noon"}
            ]
        },
        {
            "day": 2,
            "title": "East coast",
            "activities": [
                {"time": "Morning", "activity": "Seongsan Ilchulbong", "description": "Sunrise peak"}
            ]
        }
    ]
}"#;

#[tokio::test]
async fn decodes_generated_plan() {
    let endpoint = spawn_gemini(PLAN, StatusCode::OK).await;
    let plan = planner(endpoint, API_KEY).generate(&jeju()).await.unwrap();

    assert_eq!(plan.summary, "Volcanic hikes and sea views");
    assert_eq!(plan.estimated_cost, "$300 - $450");
    assert_eq!(plan.itinerary.len(), 2);
    assert_eq!(plan.itinerary[1].activities[0].activity, "Seongsan Ilchulbong");
}

#[tokio::test]
async fn wrong_key_surfaces_http_status() {
    let endpoint = spawn_gemini(PLAN, StatusCode::OK).await;
    let err = planner(endpoint, "other-key")
        .generate(&jeju())
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::Status { status: 403, .. }));
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    let endpoint = spawn_gemini(PLAN, StatusCode::SERVICE_UNAVAILABLE).await;
    let err = planner(endpoint, API_KEY).generate(&jeju()).await.unwrap_err();
    assert!(matches!(err, PlannerError::Status { status: 503, .. }));
}

#[tokio::test]
async fn malformed_plan_text_is_a_decode_error() {
    let endpoint = spawn_gemini("Sorry, I can't help with that.", StatusCode::OK).await;
    let err = planner(endpoint, API_KEY).generate(&jeju()).await.unwrap_err();
    assert!(matches!(err, PlannerError::Decode(_)));
}
