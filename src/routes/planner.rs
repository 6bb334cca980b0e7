use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::auth::User;
use crate::error::{AppError, AppResult};
use crate::extractors::{MaybeUser, Visitor};
use crate::planner::{PlanRequest, PlanState, TravelStyle};
use crate::routes::home::Html;
use crate::routes::SelectOption;
use crate::state::AppState;

const DURATIONS: [&str; 6] = ["1 Day", "2 Days", "3 Days", "5 Days", "1 Week", "2 Weeks"];
const BUDGETS: [&str; 3] = ["Budget", "Medium", "Luxury"];

#[derive(Debug, Clone, Deserialize)]
pub struct PlanForm {
    #[serde(default)]
    pub destination: String,
    pub duration: String,
    pub style: TravelStyle,
    #[serde(default)]
    pub budget: Option<String>,
}

impl Default for PlanForm {
    fn default() -> Self {
        Self {
            destination: String::new(),
            duration: "3 Days".to_string(),
            style: TravelStyle::Relaxed,
            budget: Some("Medium".to_string()),
        }
    }
}

impl From<PlanForm> for PlanRequest {
    fn from(form: PlanForm) -> Self {
        PlanRequest {
            destination: form.destination.trim().to_string(),
            duration: form.duration,
            style: form.style,
            budget: form.budget.filter(|b| !b.trim().is_empty()),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/planner.html")]
pub struct PlannerTemplate {
    pub user: Option<User>,
    pub destination: String,
    pub durations: Vec<SelectOption>,
    pub styles: Vec<SelectOption>,
    pub budgets: Vec<SelectOption>,
    pub state: PlanState,
}

impl PlannerTemplate {
    fn new(user: Option<User>, form: &PlanForm, state: PlanState) -> Self {
        let budget = form.budget.as_deref().unwrap_or_default();
        Self {
            user,
            destination: form.destination.clone(),
            durations: DURATIONS
                .iter()
                .map(|d| SelectOption::new(d, d, *d == form.duration))
                .collect(),
            styles: TravelStyle::ALL
                .iter()
                .map(|s| SelectOption::new(s.as_str(), s.as_str(), *s == form.style))
                .collect(),
            budgets: BUDGETS
                .iter()
                .map(|b| SelectOption::new(b, b, *b == budget))
                .collect(),
            state,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/planner", get(page).post(generate))
        .route("/planner/cancel", post(cancel))
}

async fn current_state(state: &AppState, visitor: &Visitor) -> PlanState {
    let plans = state.plans.lock().await;
    plans
        .get(&visitor.id)
        .map(|tracker| tracker.state().clone())
        .unwrap_or_default()
}

fn respond(visitor: &Visitor, template: PlannerTemplate) -> Response {
    let status = if template.state.error().is_some() {
        AppError::GenerationFailed.status()
    } else {
        StatusCode::OK
    };
    let cookie = visitor.cookie().map(|c| (header::SET_COOKIE, c));
    (status, AppendHeaders(cookie), Html(template)).into_response()
}

pub async fn page(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    visitor: Visitor,
) -> AppResult<Response> {
    let plan_state = current_state(&state, &visitor).await;
    let template = PlannerTemplate::new(user, &PlanForm::default(), plan_state);
    Ok(respond(&visitor, template))
}

pub async fn generate(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    visitor: Visitor,
    Form(form): Form<PlanForm>,
) -> AppResult<Response> {
    let request = PlanRequest::from(form.clone());
    if !request.is_ready() {
        let plan_state = current_state(&state, &visitor).await;
        return Ok(respond(&visitor, PlannerTemplate::new(user, &form, plan_state)));
    }

    let ticket = {
        let mut plans = state.plans.lock().await;
        plans.entry(&visitor.id).begin()
    };
    let generation = ticket.generation();
    tracing::info!(
        "Generating itinerary for {} ({}, {})",
        request.destination,
        request.duration,
        request.style
    );

    // No lock is held while the planner runs.
    let outcome = ticket.run(state.planner.as_ref(), &request).await;

    let plan_state = {
        let mut plans = state.plans.lock().await;
        let tracker = plans.entry(&visitor.id);
        tracker.finish(generation, outcome);
        tracker.state().clone()
    };

    Ok(respond(&visitor, PlannerTemplate::new(user, &form, plan_state)))
}

pub async fn cancel(State(state): State<AppState>, visitor: Visitor) -> Redirect {
    let mut plans = state.plans.lock().await;
    if let Some(tracker) = plans.get_mut(&visitor.id) {
        tracker.cancel();
    }
    Redirect::to("/planner")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_becomes_trimmed_request() {
        let request = PlanRequest::from(PlanForm {
            destination: "  Gyeongju ".into(),
            duration: "2 Days".into(),
            style: TravelStyle::Cultural,
            budget: Some(" ".into()),
        });
        assert_eq!(request.destination, "Gyeongju");
        assert_eq!(request.budget, None);
        assert!(request.is_ready());
    }

    #[test]
    fn template_marks_selected_options() {
        let form = PlanForm {
            style: TravelStyle::Foodie,
            ..PlanForm::default()
        };
        let template = PlannerTemplate::new(None, &form, PlanState::Idle);
        let selected: Vec<&str> = template
            .durations
            .iter()
            .chain(&template.styles)
            .chain(&template.budgets)
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, vec!["3 Days", "Foodie", "Medium"]);
    }
}
