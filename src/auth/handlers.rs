use axum::extract::{Path, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::auth::session::{simulated_login, Provider, SESSION_TTL};
use crate::error::{AppError, AppResult};
use crate::extractors::{clear_cookie, get_cookie_value, session_cookie, SESSION_COOKIE};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> AppResult<Response> {
    let provider = Provider::parse(&provider)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown login provider: {}", provider)))?;

    let user = simulated_login(provider);
    let token = state.users.lock().await.sign_in(user);

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/".to_string()),
            (
                header::SET_COOKIE,
                session_cookie(SESSION_COOKIE, &token, SESSION_TTL.as_secs()),
            ),
        ],
        "",
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, parts: Parts) -> AppResult<Response> {
    if let Some(token) = get_cookie_value(&parts, SESSION_COOKIE) {
        if let Some(user) = state.users.lock().await.sign_out(token) {
            tracing::info!("Traveler signed out ({})", user.provider.as_str());
        }
    }

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, clear_cookie(SESSION_COOKIE)),
        ],
        "",
    )
        .into_response())
}
