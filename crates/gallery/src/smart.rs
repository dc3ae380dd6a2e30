use crate::{id::PhotoId, photo::Photo};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmartAlbumKind {
    Unsorted,
    Starred,
    Public,
    Recent,
}

impl SmartAlbumKind {
    pub const ALL: [SmartAlbumKind; 4] = [
        SmartAlbumKind::Unsorted,
        SmartAlbumKind::Starred,
        SmartAlbumKind::Public,
        SmartAlbumKind::Recent,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SmartAlbumKind::Unsorted => "unsorted",
            SmartAlbumKind::Starred => "starred",
            SmartAlbumKind::Public => "public",
            SmartAlbumKind::Recent => "recent",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            SmartAlbumKind::Unsorted => "Unsorted",
            SmartAlbumKind::Starred => "Starred",
            SmartAlbumKind::Public => "Public",
            SmartAlbumKind::Recent => "Recent",
        }
    }

    pub fn contains(self, photo: &Photo, now: DateTime<Utc>, recent: Duration) -> bool {
        match self {
            SmartAlbumKind::Unsorted => photo.album_id.is_none(),
            SmartAlbumKind::Starred => photo.star,
            SmartAlbumKind::Public => photo.public,
            // a window reaching past the calendar covers every photo
            SmartAlbumKind::Recent => now
                .checked_sub_signed(recent)
                .is_none_or(|since| photo.created_at >= since),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SmartAlbum {
    pub id: SmartAlbumKind,
    pub title: &'static str,
    pub num_photos: usize,
    pub thumb: Option<PhotoId>,
}

impl SmartAlbum {
    /// Collects the photos of `kind` out of `photos`; the newest becomes the thumb.
    pub fn collect<'a>(
        kind: SmartAlbumKind,
        photos: impl IntoIterator<Item = &'a Photo>,
        now: DateTime<Utc>,
        recent: Duration,
    ) -> Self {
        let members: Vec<&Photo> = photos
            .into_iter()
            .filter(|photo| kind.contains(photo, now, recent))
            .collect();

        Self {
            id: kind,
            title: kind.title(),
            num_photos: members.len(),
            thumb: members
                .iter()
                .max_by_key(|photo| photo.created_at)
                .map(|photo| photo.id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::photo;
    use chrono::TimeZone;

    #[test]
    fn ids_round_trip() {
        for kind in SmartAlbumKind::ALL {
            assert_eq!(SmartAlbumKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(SmartAlbumKind::from_id("album0000000000000000001"), None);
    }

    #[test]
    fn recent_window() {
        let now = Utc.with_ymd_and_hms(2021, 5, 3, 12, 0, 0).unwrap();
        let taken = photo(1, None);

        assert!(SmartAlbumKind::Recent.contains(&taken, now, Duration::days(7)));
        assert!(!SmartAlbumKind::Recent.contains(&taken, now, Duration::days(1)));
    }

    #[test]
    fn window_past_the_calendar_covers_everything() {
        let now = Utc.with_ymd_and_hms(2021, 5, 3, 12, 0, 0).unwrap();
        let recent = Duration::days(1_000_000_000);

        assert!(SmartAlbumKind::Recent.contains(&photo(1, None), now, recent));
        let photos = [photo(1, None), photo(2, None)];
        let album = SmartAlbum::collect(SmartAlbumKind::Recent, &photos, now, recent);
        assert_eq!(album.num_photos, 2);
    }
}
