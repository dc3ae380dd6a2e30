use crate::{error::ApiError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use gallery::{id::UserId, user::Viewer};

pub const USER_HEADER: &str = "x-gallery-user";

/// The caller, identified by the numeric id in `X-Gallery-User`.
/// No header, or an id nobody is configured with, means a guest.
pub struct CurrentViewer(pub Viewer);

impl FromRequestParts<AppState> for CurrentViewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_HEADER) else {
            return Ok(Self(Viewer::Guest));
        };

        let id: u64 = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| ApiError::BadUser(format!("{value:?}")))?;

        match state.config.user(UserId::from(id)) {
            Some(user) => Ok(Self(Viewer::User(user.clone()))),
            None => {
                tracing::warn!(user_id = id, "unknown user, treating as guest");
                Ok(Self(Viewer::Guest))
            }
        }
    }
}
