use crate::{
    album::Album,
    id::{AlbumId, PhotoId, UserId},
    photo::Photo,
    user::{User, Viewer},
};
use chrono::{TimeZone, Utc};

pub const OWNER: u64 = 1;

pub fn album_id(n: u32) -> AlbumId {
    format!("album{n:019}").parse().unwrap()
}

pub fn photo_id(n: u32) -> PhotoId {
    format!("photo{n:019}").parse().unwrap()
}

pub fn album(n: u32, public: bool, viewable: bool) -> Album {
    Album {
        id: album_id(n),
        title: format!("album {n}"),
        description: None,
        owner_id: UserId::from(OWNER),
        parent_id: None,
        public,
        viewable,
        nsfw: false,
        created_at: Utc.with_ymd_and_hms(2021, 5, 1, 12, 0, 0).unwrap(),
    }
}

pub fn photo(n: u32, album: Option<u32>) -> Photo {
    Photo {
        id: photo_id(n),
        album_id: album.map(album_id),
        owner_id: UserId::from(OWNER),
        title: format!("photo {n}"),
        description: None,
        tags: Vec::new(),
        star: false,
        public: false,
        mime_type: "image/jpeg".into(),
        filesize: 2048,
        width: Some(1920),
        height: Some(1080),
        taken_at: None,
        created_at: Utc.with_ymd_and_hms(2021, 5, 1, 12, 0, n).unwrap(),
        license: "none".into(),
    }
}

pub fn user(id: u64, may_upload: bool) -> Viewer {
    Viewer::User(User {
        id: UserId::from(id),
        username: format!("user{id}"),
        may_upload,
    })
}
