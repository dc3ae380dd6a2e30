use crate::{
    album::{Album, AlbumFilter, AlbumSummary},
    error::GalleryError,
    id::AlbumId,
    photo::Photo,
};
use serde::Deserialize;
use std::{
    path::Path,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Read access to the album store.
///
/// Ordering is the store's natural ordering. Callers should only rely on it
/// being stable between calls that see the same data. Separate calls may
/// observe concurrent writes unless made under [`AlbumCatalog::pin`].
pub trait AlbumCatalog: Send + Sync {
    fn albums(&self, filter: AlbumFilter) -> Result<Vec<Album>, GalleryError>;

    fn photos_of(&self, album: &AlbumId) -> Result<Vec<Photo>, GalleryError>;

    /// Holds writers off until the pin drops. Stores without writers need
    /// not pin anything.
    fn pin(&self) -> Result<CatalogPin<'_>, GalleryError> {
        Ok(CatalogPin::unpinned())
    }
}

/// Keeps catalog writers waiting while alive.
#[must_use]
pub struct CatalogPin<'a> {
    _guard: Option<RwLockReadGuard<'a, ()>>,
}

impl CatalogPin<'_> {
    pub fn unpinned() -> Self {
        Self { _guard: None }
    }
}

/// Initial catalog contents, as read from a seed file.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Default)]
struct CatalogState {
    albums: Vec<Album>,
    photos: Vec<Photo>,
}

/// Catalog kept in memory in insertion order. Clones share the same data.
///
/// Writers take `gate` exclusively before touching `state`; readers that need
/// several consistent reads hold it shared through [`AlbumCatalog::pin`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    gate: Arc<RwLock<()>>,
    state: Arc<RwLock<CatalogState>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: CatalogSeed) -> Result<Self, GalleryError> {
        let catalog = Self::new();
        for album in seed.albums {
            catalog.insert_album(album)?;
        }
        for photo in seed.photos {
            catalog.insert_photo(photo)?;
        }
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GalleryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let seed: CatalogSeed = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            albums = seed.albums.len(),
            photos = seed.photos.len(),
            "loaded catalog seed"
        );
        Self::from_seed(seed)
    }

    pub fn insert_album(&self, album: Album) -> Result<(), GalleryError> {
        let _gate = self.exclusive()?;
        let mut state = self.write()?;
        if let Some(parent) = &album.parent_id
            && !state.albums.iter().any(|a| &a.id == parent)
        {
            return Err(GalleryError::AlbumNotFound(parent.clone()));
        }
        state.albums.push(album);
        Ok(())
    }

    pub fn insert_photo(&self, photo: Photo) -> Result<(), GalleryError> {
        let _gate = self.exclusive()?;
        let mut state = self.write()?;
        if let Some(album) = &photo.album_id
            && !state.albums.iter().any(|a| &a.id == album)
        {
            return Err(GalleryError::AlbumNotFound(album.clone()));
        }
        state.photos.push(photo);
        Ok(())
    }

    pub fn album(&self, id: &AlbumId) -> Result<Option<Album>, GalleryError> {
        Ok(self.read()?.albums.iter().find(|a| &a.id == id).cloned())
    }

    /// Albums directly below `parent`; `None` selects the root level.
    pub fn children_of(&self, parent: Option<&AlbumId>) -> Result<Vec<Album>, GalleryError> {
        Ok(self
            .read()?
            .albums
            .iter()
            .filter(|a| a.parent_id.as_ref() == parent)
            .cloned()
            .collect())
    }

    pub fn photos(&self) -> Result<Vec<Photo>, GalleryError> {
        Ok(self.read()?.photos.clone())
    }

    pub fn summary(&self, album: &Album) -> Result<AlbumSummary, GalleryError> {
        let state = self.read()?;
        let photos: Vec<&Photo> = state
            .photos
            .iter()
            .filter(|p| p.album_id.as_ref() == Some(&album.id))
            .collect();

        Ok(AlbumSummary {
            id: album.id.clone(),
            title: album.title.clone(),
            thumb: photos
                .iter()
                .max_by_key(|p| p.created_at)
                .map(|p| p.id.clone()),
            num_photos: photos.len(),
            num_subalbums: state
                .albums
                .iter()
                .filter(|a| a.parent_id.as_ref() == Some(&album.id))
                .count(),
            public: album.public,
            nsfw: album.nsfw,
            created_at: album.created_at,
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>, GalleryError> {
        self.state.read().map_err(|_| GalleryError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, GalleryError> {
        self.state.write().map_err(|_| GalleryError::Poisoned)
    }

    fn exclusive(&self) -> Result<RwLockWriteGuard<'_, ()>, GalleryError> {
        self.gate.write().map_err(|_| GalleryError::Poisoned)
    }
}

impl AlbumCatalog for MemoryCatalog {
    fn albums(&self, filter: AlbumFilter) -> Result<Vec<Album>, GalleryError> {
        Ok(self
            .read()?
            .albums
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn photos_of(&self, album: &AlbumId) -> Result<Vec<Photo>, GalleryError> {
        let state = self.read()?;
        if !state.albums.iter().any(|a| &a.id == album) {
            return Err(GalleryError::AlbumNotFound(album.clone()));
        }

        Ok(state
            .photos
            .iter()
            .filter(|p| p.album_id.as_ref() == Some(album))
            .cloned()
            .collect())
    }

    fn pin(&self) -> Result<CatalogPin<'_>, GalleryError> {
        let guard = self.gate.read().map_err(|_| GalleryError::Poisoned)?;
        Ok(CatalogPin {
            _guard: Some(guard),
        })
    }
}
