use crate::config::Config;
use gallery::{
    albums::{CatalogSmartAlbums, CatalogTopAlbums, DetailAlbumPrepare, SummaryAlbumsPrepare},
    catalog::MemoryCatalog,
    photo::{PhotoPresenter, UrlPhotoPresenter},
    session::ViewerSession,
    snapshot::DemoSnapshotBuilder,
    user::Viewer,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: MemoryCatalog,
    pub presenter: Arc<dyn PhotoPresenter>,
    pub demo: DemoSnapshotBuilder,
}

impl AppState {
    pub fn new(config: Config, catalog: MemoryCatalog) -> anyhow::Result<Self> {
        let presenter: Arc<dyn PhotoPresenter> = Arc::new(UrlPhotoPresenter::default());

        // the demo deployment is browsed anonymously, so record what a guest sees
        let guest = Viewer::Guest;
        let demo = DemoSnapshotBuilder::new(
            Arc::new(ViewerSession::new(guest.clone(), config.public_config())),
            Arc::new(CatalogTopAlbums::new(catalog.clone(), guest.clone())),
            Arc::new(CatalogSmartAlbums::new(
                catalog.clone(),
                guest.clone(),
                config.recent_window()?,
            )),
            Arc::new(SummaryAlbumsPrepare::new(catalog.clone())),
            Arc::new(catalog.clone()),
            Arc::new(DetailAlbumPrepare::new(
                catalog.clone(),
                guest,
                presenter.clone(),
            )),
            presenter.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            catalog,
            presenter,
            demo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_recent_window() {
        let mut config = Config::default();
        config.catalog.recent_days = -3;
        assert!(AppState::new(config, MemoryCatalog::new()).is_err());
    }
}
