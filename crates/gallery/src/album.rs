use crate::id::{AlbumId, PhotoId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: UserId,
    #[serde(default)]
    pub parent_id: Option<AlbumId>,
    #[serde(default)]
    pub public: bool,
    #[serde(default = "default_viewable")]
    pub viewable: bool,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_viewable() -> bool {
    true
}

/// Predicate over the two album flags. `None` leaves a flag unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlbumFilter {
    pub public: Option<bool>,
    pub viewable: Option<bool>,
}

impl AlbumFilter {
    pub const ALL: AlbumFilter = AlbumFilter {
        public: None,
        viewable: None,
    };

    pub const PUBLIC_VIEWABLE: AlbumFilter = AlbumFilter {
        public: Some(true),
        viewable: Some(true),
    };

    pub fn matches(&self, album: &Album) -> bool {
        self.public.is_none_or(|public| album.public == public)
            && self.viewable.is_none_or(|viewable| album.viewable == viewable)
    }
}

/// Compact album representation used in listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AlbumSummary {
    pub id: AlbumId,
    pub title: String,
    pub thumb: Option<PhotoId>,
    pub num_photos: usize,
    pub num_subalbums: usize,
    pub public: bool,
    pub nsfw: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(public: bool, viewable: bool) -> Album {
        Album {
            id: "album0000000000000000001".parse().unwrap(),
            title: "holiday".into(),
            description: None,
            owner_id: UserId::ADMIN,
            parent_id: None,
            public,
            viewable,
            nsfw: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn public_viewable_filter_requires_both_flags() {
        let filter = AlbumFilter::PUBLIC_VIEWABLE;
        assert!(filter.matches(&album(true, true)));
        assert!(!filter.matches(&album(true, false)));
        assert!(!filter.matches(&album(false, true)));
        assert!(AlbumFilter::ALL.matches(&album(false, false)));
    }

    #[test]
    fn seed_defaults() {
        let album: Album = serde_json::from_value(serde_json::json!({
            "id": "album0000000000000000002",
            "title": "defaults",
            "owner_id": 3,
        }))
        .unwrap();
        assert!(!album.public);
        assert!(album.viewable);
        assert!(album.parent_id.is_none());
    }
}
