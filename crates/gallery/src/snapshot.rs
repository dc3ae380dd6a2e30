//! Demo snapshot: a recording of the read-only API calls a public demo
//! deployment needs to answer, captured against the current catalog.

use crate::{
    album::{Album, AlbumFilter},
    albums::{self, AlbumPrepare, AlbumsPrepare, SmartAlbums, TopAlbums},
    catalog::AlbumCatalog,
    error::GalleryError,
    photo::PhotoPresenter,
    session::SessionInit,
    transcript::Transcript,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

pub const SESSION_INIT: &str = "Session::init()";
pub const ALBUMS_GET: &str = "Albums::get";
pub const ALBUM_GET: &str = "Album::get";
pub const PHOTO_GET: &str = "Photo::get";

/// The `gen_demo_js` setting. Only `1` (or a boolean `true`) turns generation on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoFlag(bool);

impl DemoFlag {
    pub const ON: DemoFlag = DemoFlag(true);
    pub const OFF: DemoFlag = DemoFlag(false);

    pub fn from_setting(value: &str) -> Self {
        Self(value.trim() == "1")
    }

    pub fn is_enabled(self) -> bool {
        self.0
    }
}

impl From<bool> for DemoFlag {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for DemoFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Setting {
            Bool(bool),
            Int(i64),
            Str(String),
        }

        Ok(match Setting::deserialize(deserializer)? {
            Setting::Bool(b) => Self(b),
            Setting::Int(i) => Self(i == 1),
            Setting::Str(s) => Self::from_setting(&s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    #[serde(rename = "albumID")]
    AlbumId,
    #[serde(rename = "photoID")]
    PhotoId,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::AlbumId => "albumID",
            EntryKind::PhotoId => "photoID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRecord {
    pub id: String,
    /// Pre-serialized JSON.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryPayload {
    String {
        data: String,
    },
    Array {
        kind: EntryKind,
        array: Vec<SnapshotRecord>,
    },
}

/// One recorded API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub name: String,
    #[serde(flatten)]
    pub payload: EntryPayload,
}

impl SnapshotEntry {
    fn string(name: &str, value: &impl Serialize) -> Result<Self, GalleryError> {
        Ok(Self {
            name: name.to_string(),
            payload: EntryPayload::String {
                data: serde_json::to_string(value)?,
            },
        })
    }

    fn array(name: &str, kind: EntryKind, array: Vec<SnapshotRecord>) -> Self {
        Self {
            name: name.to_string(),
            payload: EntryPayload::Array { kind, array },
        }
    }

    pub fn records(&self) -> &[SnapshotRecord] {
        match &self.payload {
            EntryPayload::String { .. } => &[],
            EntryPayload::Array { array, .. } => array,
        }
    }
}

#[derive(Debug)]
pub enum DemoOutcome {
    /// Generation is disabled; send the client to the home page.
    Redirect,
    Transcript(Transcript),
}

/// Builds the demo transcript out of explicitly provided collaborators.
#[derive(Clone)]
pub struct DemoSnapshotBuilder {
    session: Arc<dyn SessionInit>,
    top: Arc<dyn TopAlbums>,
    smart: Arc<dyn SmartAlbums>,
    albums_prepare: Arc<dyn AlbumsPrepare>,
    catalog: Arc<dyn AlbumCatalog>,
    album_prepare: Arc<dyn AlbumPrepare>,
    photos: Arc<dyn PhotoPresenter>,
}

impl DemoSnapshotBuilder {
    pub fn new(
        session: Arc<dyn SessionInit>,
        top: Arc<dyn TopAlbums>,
        smart: Arc<dyn SmartAlbums>,
        albums_prepare: Arc<dyn AlbumsPrepare>,
        catalog: Arc<dyn AlbumCatalog>,
        album_prepare: Arc<dyn AlbumPrepare>,
        photos: Arc<dyn PhotoPresenter>,
    ) -> Self {
        Self {
            session,
            top,
            smart,
            albums_prepare,
            catalog,
            album_prepare,
            photos,
        }
    }

    /// Records the session, the album listing, every public and viewable
    /// album, and every photo in those albums, in that order. The first
    /// failing collaborator aborts the whole build. The catalog stays pinned
    /// for the whole build, so every entry sees the same photos.
    pub fn build(&self, flag: DemoFlag) -> Result<DemoOutcome, GalleryError> {
        if !flag.is_enabled() {
            tracing::debug!("demo generation disabled");
            return Ok(DemoOutcome::Redirect);
        }

        let _pin = self.catalog.pin()?;

        let session = SnapshotEntry::string(SESSION_INIT, &self.session.init()?)?;
        let listing = albums::list(
            self.top.as_ref(),
            self.smart.as_ref(),
            self.albums_prepare.as_ref(),
        )?;
        let listing = SnapshotEntry::string(ALBUMS_GET, &listing)?;

        let albums = self.catalog.albums(AlbumFilter::PUBLIC_VIEWABLE)?;
        let album_entry = self.album_entry(&albums)?;
        let photo_entry = self.photo_entry(&albums)?;

        tracing::info!(
            albums = album_entry.records().len(),
            photos = photo_entry.records().len(),
            "built demo snapshot"
        );

        Ok(DemoOutcome::Transcript(Transcript::new(vec![
            session,
            listing,
            album_entry,
            photo_entry,
        ])))
    }

    fn album_entry(&self, albums: &[Album]) -> Result<SnapshotEntry, GalleryError> {
        let mut records = Vec::with_capacity(albums.len());
        for album in albums {
            let detail = self.album_prepare.prepare(album)?;
            records.push(SnapshotRecord {
                id: album.id.to_string(),
                data: serde_json::to_string(&detail)?,
            });
        }
        Ok(SnapshotEntry::array(ALBUM_GET, EntryKind::AlbumId, records))
    }

    fn photo_entry(&self, albums: &[Album]) -> Result<SnapshotEntry, GalleryError> {
        let mut records = Vec::new();
        for album in albums {
            for photo in self.catalog.photos_of(&album.id)? {
                let resource = self.photos.present(&photo)?;
                records.push(SnapshotRecord {
                    id: photo.id.to_string(),
                    data: serde_json::to_string(&resource.listed_under(&album.id))?,
                });
            }
        }
        Ok(SnapshotEntry::array(PHOTO_GET, EntryKind::PhotoId, records))
    }
}
