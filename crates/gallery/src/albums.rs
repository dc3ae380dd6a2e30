//! Album listing and album detail collaborators.
//!
//! The listing is composed from three parts: the root albums the viewer may
//! see, the smart albums, and a preparation step that turns both into the
//! resource sent to clients.

use crate::{
    album::{Album, AlbumSummary},
    catalog::{AlbumCatalog, MemoryCatalog},
    error::GalleryError,
    id::{AlbumId, UserId},
    photo::{PhotoPresenter, PhotoResource},
    smart::{SmartAlbum, SmartAlbumKind},
    user::Viewer,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopAlbumsResult {
    pub albums: Vec<Album>,
    pub shared_albums: Vec<Album>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AlbumsResource {
    pub albums: Vec<AlbumSummary>,
    pub shared_albums: Vec<AlbumSummary>,
    pub smart_albums: Vec<SmartAlbum>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AlbumResource {
    pub id: AlbumId,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub parent_id: Option<AlbumId>,
    pub public: bool,
    pub viewable: bool,
    pub nsfw: bool,
    pub created_at: DateTime<Utc>,
    pub albums: Vec<AlbumSummary>,
    pub photos: Vec<PhotoResource>,
    pub num_photos: usize,
}

pub trait TopAlbums: Send + Sync {
    fn get(&self) -> Result<TopAlbumsResult, GalleryError>;
}

pub trait SmartAlbums: Send + Sync {
    fn get(&self) -> Result<Vec<SmartAlbum>, GalleryError>;
}

pub trait AlbumsPrepare: Send + Sync {
    fn prepare(
        &self,
        top: TopAlbumsResult,
        smart: Vec<SmartAlbum>,
    ) -> Result<AlbumsResource, GalleryError>;
}

pub trait AlbumPrepare: Send + Sync {
    fn prepare(&self, album: &Album) -> Result<AlbumResource, GalleryError>;
}

/// The album listing shown on the gallery's front page.
pub fn list(
    top: &dyn TopAlbums,
    smart: &dyn SmartAlbums,
    prepare: &dyn AlbumsPrepare,
) -> Result<AlbumsResource, GalleryError> {
    let top = top.get()?;
    let smart = smart.get()?;
    prepare.prepare(top, smart)
}

#[derive(Debug, Clone)]
pub struct CatalogTopAlbums {
    catalog: MemoryCatalog,
    viewer: Viewer,
}

impl CatalogTopAlbums {
    pub fn new(catalog: MemoryCatalog, viewer: Viewer) -> Self {
        Self { catalog, viewer }
    }
}

impl TopAlbums for CatalogTopAlbums {
    fn get(&self) -> Result<TopAlbumsResult, GalleryError> {
        let mut result = TopAlbumsResult::default();
        for album in self.catalog.children_of(None)? {
            if !self.viewer.can_list_album(&album) {
                continue;
            }

            match self.viewer.user() {
                Some(user) if user.id != album.owner_id => result.shared_albums.push(album),
                _ => result.albums.push(album),
            }
        }
        Ok(result)
    }
}

#[derive(Debug, Clone)]
pub struct CatalogSmartAlbums {
    catalog: MemoryCatalog,
    viewer: Viewer,
    recent: Duration,
}

impl CatalogSmartAlbums {
    pub fn new(catalog: MemoryCatalog, viewer: Viewer, recent: Duration) -> Self {
        Self {
            catalog,
            viewer,
            recent,
        }
    }
}

impl SmartAlbums for CatalogSmartAlbums {
    fn get(&self) -> Result<Vec<SmartAlbum>, GalleryError> {
        let albums: HashMap<AlbumId, Album> = self
            .catalog
            .albums(crate::album::AlbumFilter::ALL)?
            .into_iter()
            .map(|album| (album.id.clone(), album))
            .collect();

        let photos = self.catalog.photos()?;
        let visible: Vec<_> = photos
            .iter()
            .filter(|photo| {
                let owning = photo.album_id.as_ref().and_then(|id| albums.get(id));
                self.viewer.can_see_photo(photo, owning)
            })
            .collect();

        let now = Utc::now();
        Ok(SmartAlbumKind::ALL
            .into_iter()
            .filter(|kind| *kind != SmartAlbumKind::Unsorted || self.viewer.is_logged_in())
            .map(|kind| SmartAlbum::collect(kind, visible.iter().copied(), now, self.recent))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct SummaryAlbumsPrepare {
    catalog: MemoryCatalog,
}

impl SummaryAlbumsPrepare {
    pub fn new(catalog: MemoryCatalog) -> Self {
        Self { catalog }
    }

    fn summarize(&self, albums: &[Album]) -> Result<Vec<AlbumSummary>, GalleryError> {
        albums.iter().map(|a| self.catalog.summary(a)).collect()
    }
}

impl AlbumsPrepare for SummaryAlbumsPrepare {
    fn prepare(
        &self,
        top: TopAlbumsResult,
        smart: Vec<SmartAlbum>,
    ) -> Result<AlbumsResource, GalleryError> {
        Ok(AlbumsResource {
            albums: self.summarize(&top.albums)?,
            shared_albums: self.summarize(&top.shared_albums)?,
            smart_albums: smart,
        })
    }
}

pub struct DetailAlbumPrepare {
    catalog: MemoryCatalog,
    viewer: Viewer,
    presenter: Arc<dyn PhotoPresenter>,
}

impl DetailAlbumPrepare {
    pub fn new(catalog: MemoryCatalog, viewer: Viewer, presenter: Arc<dyn PhotoPresenter>) -> Self {
        Self {
            catalog,
            viewer,
            presenter,
        }
    }
}

impl AlbumPrepare for DetailAlbumPrepare {
    fn prepare(&self, album: &Album) -> Result<AlbumResource, GalleryError> {
        let children = self
            .catalog
            .children_of(Some(&album.id))?
            .into_iter()
            .filter(|child| self.viewer.can_list_album(child))
            .map(|child| self.catalog.summary(&child))
            .collect::<Result<Vec<_>, _>>()?;

        let photos = self
            .catalog
            .photos_of(&album.id)?
            .iter()
            .filter(|photo| self.viewer.can_see_photo(photo, Some(album)))
            .map(|photo| self.presenter.present(photo))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AlbumResource {
            id: album.id.clone(),
            title: album.title.clone(),
            description: album.description.clone(),
            owner_id: album.owner_id,
            parent_id: album.parent_id.clone(),
            public: album.public,
            viewable: album.viewable,
            nsfw: album.nsfw,
            created_at: album.created_at,
            albums: children,
            num_photos: photos.len(),
            photos,
        })
    }
}
