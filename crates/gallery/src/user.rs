use crate::{album::Album, id::UserId, photo::Photo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub may_upload: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.id == UserId::ADMIN
    }
}

/// Whoever is looking at the catalog. The demo transcript is always
/// produced for a guest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Viewer {
    #[default]
    Guest,
    User(User),
}

impl Viewer {
    pub fn user(&self) -> Option<&User> {
        match self {
            Viewer::Guest => None,
            Viewer::User(user) => Some(user),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user().is_some()
    }

    /// Albums shown in listings. Public albums that are not viewable are
    /// reachable by direct link only, so they are left out.
    pub fn can_list_album(&self, album: &Album) -> bool {
        match self {
            Viewer::User(user) if user.is_admin() => true,
            Viewer::User(user) if user.id == album.owner_id => true,
            _ => album.public && album.viewable,
        }
    }

    pub fn can_see_photo(&self, photo: &Photo, owning_album: Option<&Album>) -> bool {
        if let Viewer::User(user) = self
            && (user.is_admin() || user.id == photo.owner_id)
        {
            return true;
        }

        photo.public || owning_album.is_some_and(|album| album.public)
    }
}
