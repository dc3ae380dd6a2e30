//! The photo upload request: validation of the submitted form, write
//! authorization on the target album, and ingestion into the catalog.

use crate::{
    catalog::MemoryCatalog,
    error::GalleryError,
    id::{AlbumId, InvalidId, PhotoId},
    photo::{ACCEPTED_TYPES, Photo, extension_for},
    smart::SmartAlbumKind,
    user::Viewer,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    path::Path,
};
use thiserror::Error;

pub const ALBUM_ID_ATTRIBUTE: &str = "albumID";
pub const FILE_ATTRIBUTE: &str = "0";

pub const DEFAULT_MAX_FILE_SIZE: u64 = 32 * 1024 * 1024;

/// Where an upload should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumTarget {
    Unsorted,
    Smart(SmartAlbumKind),
    Album(AlbumId),
}

impl AlbumTarget {
    /// Empty input means unsorted; smart album ids select the matching
    /// smart album; anything else has to be a regular album id.
    pub fn parse(value: &str) -> Result<Self, InvalidId> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(AlbumTarget::Unsorted);
        }
        if let Some(kind) = SmartAlbumKind::from_id(value) {
            return Ok(AlbumTarget::Smart(kind));
        }
        Ok(AlbumTarget::Album(value.parse()?))
    }

    pub fn album_id(&self) -> Option<&AlbumId> {
        match self {
            AlbumTarget::Album(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The file name without its extension, used as the photo title.
    pub fn title(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

/// A submitted multipart form: text fields and file parts by field name.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, Vec<UploadedFile>>,
}

impl UploadForm {
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.entry(name.into()).or_default().push(file);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Failed fields with their messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the given data was invalid (")?;
        for (i, field) in self.fields().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("insufficient privileges to upload into this album")]
    Forbidden,

    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

pub trait AlbumAuthorizer: Send + Sync {
    fn can_write(&self, viewer: &Viewer, target: &AlbumTarget) -> Result<bool, GalleryError>;
}

/// Turns an authorized upload into a catalog photo.
pub trait PhotoIngest: Send + Sync {
    fn add(&self, viewer: &Viewer, request: AddPhotoRequest) -> Result<Photo, GalleryError>;
}

/// A validated and authorized upload.
#[derive(Debug, Clone)]
pub struct AddPhotoRequest {
    target: AlbumTarget,
    file: UploadedFile,
}

impl AddPhotoRequest {
    /// Validates first, then checks write access. A caller without access
    /// always gets `Forbidden`, never a validation error.
    pub fn from_form(
        form: UploadForm,
        policy: &UploadPolicy,
        viewer: &Viewer,
        authorizer: &dyn AlbumAuthorizer,
    ) -> Result<Self, UploadError> {
        let request = Self::validate(form, policy)?;
        if !authorizer.can_write(viewer, &request.target)? {
            tracing::debug!(album = ?request.target, "upload rejected: no write access");
            return Err(UploadError::Forbidden);
        }
        Ok(request)
    }

    pub fn validate(mut form: UploadForm, policy: &UploadPolicy) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let target = match form.fields.get(ALBUM_ID_ATTRIBUTE) {
            None => {
                errors.add(
                    ALBUM_ID_ATTRIBUTE,
                    format!("The {ALBUM_ID_ATTRIBUTE} field is required."),
                );
                None
            }
            Some(value) => match AlbumTarget::parse(value) {
                Ok(target) => Some(target),
                Err(_) => {
                    errors.add(
                        ALBUM_ID_ATTRIBUTE,
                        format!("The {ALBUM_ID_ATTRIBUTE} is not a valid album ID."),
                    );
                    None
                }
            },
        };

        let mut files = form.files.remove(FILE_ATTRIBUTE).unwrap_or_default();
        let file = match files.len() {
            0 if form.fields.contains_key(FILE_ATTRIBUTE) => {
                errors.add(FILE_ATTRIBUTE, format!("The {FILE_ATTRIBUTE} must be a file."));
                None
            }
            0 => {
                errors.add(
                    FILE_ATTRIBUTE,
                    format!("The {FILE_ATTRIBUTE} field is required."),
                );
                None
            }
            1 => files.pop().filter(|file| check_file(file, policy, &mut errors)),
            _ => {
                errors.add(FILE_ATTRIBUTE, "Only one file may be uploaded per request.");
                None
            }
        };

        match (target, file) {
            (Some(target), Some(file)) if errors.is_empty() => Ok(Self { target, file }),
            _ => Err(errors),
        }
    }

    pub fn target(&self) -> &AlbumTarget {
        &self.target
    }

    /// The album to upload into, `None` for unsorted and smart targets.
    pub fn album_id(&self) -> Option<&AlbumId> {
        self.target.album_id()
    }

    pub fn file(&self) -> &UploadedFile {
        &self.file
    }
}

fn check_file(file: &UploadedFile, policy: &UploadPolicy, errors: &mut ValidationErrors) -> bool {
    if file.is_empty() {
        errors.add(FILE_ATTRIBUTE, format!("The {FILE_ATTRIBUTE} must not be empty."));
        return false;
    }

    if file.len() > policy.max_file_size {
        errors.add(
            FILE_ATTRIBUTE,
            format!(
                "The {FILE_ATTRIBUTE} must not be greater than {} bytes.",
                policy.max_file_size
            ),
        );
        return false;
    }

    if file.content_type.as_deref().and_then(extension_for).is_none() {
        let accepted = ACCEPTED_TYPES
            .iter()
            .map(|(mime, _)| *mime)
            .collect::<Vec<_>>()
            .join(", ");
        errors.add(
            FILE_ATTRIBUTE,
            format!("The {FILE_ATTRIBUTE} must be a file of type: {accepted}."),
        );
        return false;
    }

    true
}

impl AlbumAuthorizer for MemoryCatalog {
    fn can_write(&self, viewer: &Viewer, target: &AlbumTarget) -> Result<bool, GalleryError> {
        let Some(user) = viewer.user() else {
            return Ok(false);
        };

        if !user.is_admin() && !user.may_upload {
            return Ok(false);
        }

        match target {
            AlbumTarget::Unsorted | AlbumTarget::Smart(_) => Ok(true),
            AlbumTarget::Album(id) => Ok(self
                .album(id)?
                .is_some_and(|album| user.is_admin() || album.owner_id == user.id)),
        }
    }
}

impl PhotoIngest for MemoryCatalog {
    fn add(&self, viewer: &Viewer, request: AddPhotoRequest) -> Result<Photo, GalleryError> {
        let owner = viewer.user().ok_or(GalleryError::Unauthenticated)?;
        let file = request.file;

        let photo = Photo {
            id: PhotoId::generate(),
            album_id: request.target.album_id().cloned(),
            owner_id: owner.id,
            title: file.title(),
            description: None,
            tags: Vec::new(),
            star: request.target == AlbumTarget::Smart(SmartAlbumKind::Starred),
            public: request.target == AlbumTarget::Smart(SmartAlbumKind::Public),
            mime_type: file
                .content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            filesize: file.len(),
            width: None,
            height: None,
            taken_at: None,
            created_at: Utc::now(),
            license: "none".to_string(),
        };

        self.insert_photo(photo.clone())?;
        tracing::info!(
            photo_id = %photo.id,
            album_id = ?photo.album_id,
            size = photo.filesize,
            "added photo"
        );
        Ok(photo)
    }
}
