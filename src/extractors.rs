use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::session::generate_token;
use crate::auth::User;
use crate::error::AppError;
use crate::state::AppState;

pub const ADMIN_COOKIE: &str = "safeko_admin";
pub const SESSION_COOKIE: &str = "safeko_session";
pub const VISITOR_COOKIE: &str = "safeko_visitor";

/// Admin landing page; shows the login form when signed out.
pub const ADMIN_LOGIN_PATH: &str = "/admin";

/// Optional traveler extractor: None when nobody is signed in.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = get_cookie_value(parts, SESSION_COOKIE) else {
            return Ok(MaybeUser(None));
        };
        let mut users = state.users.lock().await;
        Ok(MaybeUser(users.current(token).cloned()))
    }
}

/// Token of a live admin session. Without one the request is sent back to
/// `/admin`, which shows the login form.
#[derive(Debug, Clone)]
pub struct AdminToken(pub String);

impl FromRequestParts<AppState> for AdminToken {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeAdmin::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?
        {
            MaybeAdmin(Some(token)) => Ok(AdminToken(token)),
            MaybeAdmin(None) => {
                tracing::debug!("Admin action without a live session: {}", parts.uri.path());
                Err(Redirect::to(ADMIN_LOGIN_PATH).into_response())
            }
        }
    }
}

/// Optional admin extractor, for pages that show a login form instead.
pub struct MaybeAdmin(pub Option<String>);

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = get_cookie_value(parts, ADMIN_COOKIE) else {
            return Ok(MaybeAdmin(None));
        };
        let mut sessions = state.admin_sessions.lock().await;
        let live = sessions.get_mut(token).is_some();
        Ok(MaybeAdmin(live.then(|| token.to_string())))
    }
}

/// Anonymous visitor id used to key planner runs. New visitors get a fresh
/// id that the handler must set with [`Visitor::cookie`].
#[derive(Debug, Clone)]
pub struct Visitor {
    pub id: String,
    pub is_new: bool,
}

impl Visitor {
    pub fn cookie(&self) -> Option<String> {
        self.is_new
            .then(|| session_cookie(VISITOR_COOKIE, &self.id, 60 * 60 * 24 * 30))
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(match get_cookie_value(parts, VISITOR_COOKIE) {
            Some(id) if !id.is_empty() => Visitor {
                id: id.to_string(),
                is_new: false,
            },
            _ => Visitor {
                id: generate_token(),
                is_new: true,
            },
        })
    }
}

pub fn session_cookie(name: &str, token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        name, token, max_age_secs
    )
}

pub fn clear_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", name)
}

pub fn get_cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}
