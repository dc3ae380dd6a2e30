use crate::id::AlbumId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("album not found: {0}")]
    AlbumNotFound(AlbumId),

    #[error("catalog lock poisoned")]
    Poisoned,

    #[error("not authenticated")]
    Unauthenticated,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
