//! Generative itinerary planner.
//!
//! The planner is an external service behind the [`Planner`] trait. Callers
//! see one of two outcomes: a complete plan, or a failure. The cause of a
//! failure is logged and never shown beyond [`GENERATION_FAILED`].

pub mod gemini;
pub mod tracker;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use gemini::GeminiPlanner;
pub use tracker::{PlanState, PlanTicket, PlanTracker, PlanTrackers};

/// User-facing message for every planner failure.
pub const GENERATION_FAILED: &str =
    "Failed to generate itinerary. Please check your API key or try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelStyle {
    #[default]
    Relaxed,
    Adventure,
    Cultural,
    Foodie,
    Shopping,
}

impl TravelStyle {
    pub const ALL: [TravelStyle; 5] = [
        TravelStyle::Relaxed,
        TravelStyle::Adventure,
        TravelStyle::Cultural,
        TravelStyle::Foodie,
        TravelStyle::Shopping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelStyle::Relaxed => "Relaxed",
            TravelStyle::Adventure => "Adventure",
            TravelStyle::Cultural => "Cultural",
            TravelStyle::Foodie => "Foodie",
            TravelStyle::Shopping => "Shopping",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub destination: String,
    pub duration: String,
    pub style: TravelStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

impl PlanRequest {
    /// A plan needs at least a destination.
    pub fn is_ready(&self) -> bool {
        !self.destination.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub activity: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub summary: String,
    pub estimated_cost: String,
    pub itinerary: Vec<ItineraryDay>,
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Planner API key is not configured")]
    MissingApiKey,

    #[error("Planner request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Planner returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Planner response could not be decoded: {0}")]
    Decode(String),

    #[error("Planner returned no content")]
    EmptyResponse,

    #[error("Planner run was cancelled")]
    Cancelled,
}

#[async_trait]
pub trait Planner: Send + Sync {
    async fn generate(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError>;
}

/// Prompt text sent to the model.
pub fn build_prompt(request: &PlanRequest) -> String {
    let budget = request
        .budget
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .map(|b| format!("Budget Level: {}\n", b))
        .unwrap_or_default();
    format!(
        "Create a detailed travel itinerary for a trip to {}.\n\
         Duration: {}.\n\
         Travel Style: {}.\n\
         {}\n\
         Please provide a structured day-by-day plan.",
        request.destination.trim(),
        request.duration,
        request.style,
        budget
    )
}

/// Decode the model's JSON text into a complete plan.
pub fn parse_plan(text: &str) -> Result<PlanResponse, PlannerError> {
    let plan: PlanResponse =
        serde_json::from_str(text).map_err(|e| PlannerError::Decode(e.to_string()))?;
    if plan.itinerary.is_empty() {
        return Err(PlannerError::Decode("itinerary has no days".into()));
    }
    Ok(plan)
}
