//! Reqwest-backed Gemini adapter.
//!
//! Owns transport only: request body, timeout, HTTP status mapping and
//! pulling the model's JSON text out of the first candidate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{build_prompt, parse_plan, PlanRequest, PlanResponse, Planner, PlannerError};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiPlanner {
    client: Client,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
}

impl GeminiPlanner {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        mut endpoint: Url,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn generate_url(&self) -> Result<Url, PlannerError> {
        self.endpoint
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| PlannerError::Decode(format!("invalid planner endpoint: {e}")))
    }
}

#[async_trait]
impl Planner for GeminiPlanner {
    async fn generate(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
        let api_key = self.api_key.as_deref().ok_or(PlannerError::MissingApiKey)?;
        let url = self.generate_url()?;

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(PlannerError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).chars().take(512).collect(),
            });
        }

        let decoded: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|e| PlannerError::Decode(format!("invalid Gemini payload: {e}")))?;
        let text = decoded.first_text().ok_or(PlannerError::EmptyResponse)?;
        parse_plan(&text)
    }
}

fn request_body(request: &PlanRequest) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": build_prompt(request) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        }
    })
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A brief, exciting summary of the trip vibe."
            },
            "estimatedCost": {
                "type": "STRING",
                "description": "Estimated cost range for the trip excluding flights."
            },
            "itinerary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "INTEGER" },
                        "title": { "type": "STRING", "description": "Theme of the day" },
                        "activities": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "time": { "type": "STRING", "description": "e.g., Morning, 10:00 AM" },
                                    "activity": { "type": "STRING", "description": "Name of the place or activity" },
                                    "description": { "type": "STRING", "description": "Short details about what to do there" }
                                },
                                "required": ["time", "activity", "description"]
                            }
                        }
                    },
                    "required": ["day", "title", "activities"]
                }
            }
        },
        "required": ["summary", "estimatedCost", "itinerary"]
    })
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::TravelStyle;

    fn planner(endpoint: &str) -> GeminiPlanner {
        GeminiPlanner::new(
            Url::parse(endpoint).unwrap(),
            DEFAULT_MODEL,
            Some("key".into()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn generate_url_targets_model() {
        let url = planner("https://example.com/api").generate_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn request_body_carries_prompt_and_schema() {
        let body = request_body(&PlanRequest {
            destination: "Busan".into(),
            duration: "2 Days".into(),
            style: TravelStyle::Adventure,
            budget: None,
        });
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Busan"));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["itinerary"]["type"],
            "ARRAY"
        );
    }

    #[test]
    fn first_text_joins_parts_of_first_candidate() {
        let decoded: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(decoded.first_text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn first_text_is_none_without_candidates() {
        let decoded: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.first_text().is_none());
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let planner = GeminiPlanner::new(
            Url::parse(DEFAULT_ENDPOINT).unwrap(),
            DEFAULT_MODEL,
            Some("  ".into()),
            Duration::from_secs(1),
        )
        .unwrap();
        let err = planner
            .generate(&PlanRequest {
                destination: "Seoul".into(),
                duration: "1 Day".into(),
                style: TravelStyle::Relaxed,
                budget: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::MissingApiKey));
    }
}
