use crate::{
    error::GalleryError,
    id::{AlbumId, PhotoId, UserId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MIME types accepted for upload, with the extension used in storage urls.
pub const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("video/mp4", "mp4"),
    ("video/quicktime", "mov"),
];

pub fn extension_for(mime_type: &str) -> Option<&'static str> {
    ACCEPTED_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(mime_type))
        .map(|(_, ext)| *ext)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Photo {
    pub id: PhotoId,
    /// `None` means the photo is unsorted.
    #[serde(default)]
    pub album_id: Option<AlbumId>,
    pub owner_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub star: bool,
    #[serde(default)]
    pub public: bool,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub filesize: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_license")]
    pub license: String,
}

fn default_license() -> String {
    "none".to_string()
}

/// Everything a client sees about a photo except which album it belongs to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PhotoDetails {
    pub id: PhotoId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub star: bool,
    pub public: bool,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub filesize: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub taken_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub license: String,
    pub url: String,
    pub thumb_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PhotoResource {
    #[serde(flatten)]
    pub details: PhotoDetails,
    #[serde(rename = "album")]
    pub owning_album_id: Option<AlbumId>,
}

impl PhotoResource {
    pub fn listed_under<'a>(&'a self, album: &'a AlbumId) -> ListedPhotoResource<'a> {
        ListedPhotoResource {
            details: &self.details,
            listed_under_album_id: album,
            owning_album_id: self.owning_album_id.as_ref(),
        }
    }
}

/// A photo as it appears while iterating some album's contents. `album` is
/// the album being iterated, `original_album` the one the photo belongs to.
#[derive(Debug, Serialize)]
pub struct ListedPhotoResource<'a> {
    #[serde(flatten)]
    pub details: &'a PhotoDetails,
    #[serde(rename = "album")]
    pub listed_under_album_id: &'a AlbumId,
    #[serde(rename = "original_album")]
    pub owning_album_id: Option<&'a AlbumId>,
}

pub trait PhotoPresenter: Send + Sync {
    fn present(&self, photo: &Photo) -> Result<PhotoResource, GalleryError>;
}

/// Presents photos with urls under a fixed upload prefix.
#[derive(Debug, Clone)]
pub struct UrlPhotoPresenter {
    prefix: String,
}

impl UrlPhotoPresenter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for UrlPhotoPresenter {
    fn default() -> Self {
        Self::new("uploads")
    }
}

impl PhotoPresenter for UrlPhotoPresenter {
    fn present(&self, photo: &Photo) -> Result<PhotoResource, GalleryError> {
        let ext = extension_for(&photo.mime_type).unwrap_or("bin");
        Ok(PhotoResource {
            details: PhotoDetails {
                id: photo.id.clone(),
                title: photo.title.clone(),
                description: photo.description.clone(),
                tags: photo.tags.clone(),
                star: photo.star,
                public: photo.public,
                mime_type: photo.mime_type.clone(),
                filesize: photo.filesize,
                width: photo.width,
                height: photo.height,
                taken_at: photo.taken_at,
                created_at: photo.created_at,
                license: photo.license.clone(),
                url: format!("{}/big/{}.{ext}", self.prefix, photo.id),
                thumb_url: format!("{}/thumb/{}.jpeg", self.prefix, photo.id),
            },
            owning_album_id: photo.album_id.clone(),
        })
    }
}
