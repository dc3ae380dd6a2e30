use crate::{error::GalleryError, id::UserId, user::Viewer};
use serde::Serialize;

pub const STATUS_GUEST: u8 = 1;
pub const STATUS_LOGGED_IN: u8 = 2;

/// Settings every client may read, logged in or not.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicConfig {
    pub site_title: String,
    pub version: String,
    pub lang: String,
    pub sorting_albums: String,
    pub sorting_photos: String,
    pub public_search: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
    pub may_upload: bool,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionResource {
    pub status: u8,
    pub config: PublicConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

pub trait SessionInit: Send + Sync {
    fn init(&self) -> Result<SessionResource, GalleryError>;
}

/// Session state for one fixed viewer.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    viewer: Viewer,
    config: PublicConfig,
}

impl ViewerSession {
    pub fn new(viewer: Viewer, config: PublicConfig) -> Self {
        Self { viewer, config }
    }
}

impl SessionInit for ViewerSession {
    fn init(&self) -> Result<SessionResource, GalleryError> {
        let user = self.viewer.user().map(|user| SessionUser {
            id: user.id,
            username: user.username.clone(),
            may_upload: user.may_upload || user.is_admin(),
            is_admin: user.is_admin(),
        });

        Ok(SessionResource {
            status: if user.is_some() {
                STATUS_LOGGED_IN
            } else {
                STATUS_GUEST
            },
            config: self.config.clone(),
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::user;

    fn config() -> PublicConfig {
        PublicConfig {
            site_title: "Gallery".into(),
            version: "0.1.0".into(),
            lang: "en".into(),
            sorting_albums: "created_at DESC".into(),
            sorting_photos: "taken_at ASC".into(),
            public_search: false,
        }
    }

    #[test]
    fn guest_session_has_no_user() {
        let session = ViewerSession::new(Viewer::Guest, config()).init().unwrap();
        assert_eq!(session.status, STATUS_GUEST);
        let value = serde_json::to_value(&session).unwrap();
        assert!(value.get("user").is_none());
        assert_eq!(value["config"]["site_title"], "Gallery");
    }

    #[test]
    fn logged_in_session_reports_rights() {
        let session = ViewerSession::new(user(4, true), config()).init().unwrap();
        assert_eq!(session.status, STATUS_LOGGED_IN);
        let user = session.user.unwrap();
        assert!(user.may_upload);
        assert!(!user.is_admin);
    }
}
