mod demo;
mod photo;

use crate::state::AppState;
use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Multipart framing on top of the file itself.
const BODY_OVERHEAD: usize = 64 * 1024;

pub const HOME: &str = "/";

pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.uploads.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_OVERHEAD);

    Router::new()
        .route(HOME, get(home))
        .route("/demo", get(demo::demo))
        .route(
            "/api/Photo::add",
            post(photo::add_photo).layer(DefaultBodyLimit::max(body_limit)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home(State(state): State<AppState>) -> String {
    format!("{}\n", state.config.site.title)
}
