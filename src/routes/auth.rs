use axum::routing::post;
use axum::Router;

use crate::auth::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login/{provider}", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
}
