use super::HOME;
use crate::{error::ApiError, state::AppState};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use gallery::snapshot::DemoOutcome;

/// `GET /demo`: the recorded responses for the public demo, as plain text.
pub async fn demo(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.demo.build(state.config.demo.gen_demo_js)? {
        DemoOutcome::Redirect => Ok(Redirect::to(HOME).into_response()),
        DemoOutcome::Transcript(transcript) => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            transcript.to_string(),
        )
            .into_response()),
    }
}
