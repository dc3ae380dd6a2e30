use chrono::TimeDelta;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use gallery::{
    id::UserId,
    session::PublicConfig,
    snapshot::DemoFlag,
    upload::{DEFAULT_MAX_FILE_SIZE, UploadPolicy},
    user::User,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub lang: String,
    pub sorting_albums: String,
    pub sorting_photos: String,
    pub public_search: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            lang: "en".to_string(),
            sorting_albums: "created_at DESC".to_string(),
            sorting_photos: "taken_at ASC".to_string(),
            public_search: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub gen_demo_js: DemoFlag,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub seed: Option<PathBuf>,
    pub recent_days: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed: None,
            recent_days: 7,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Config {
    pub fn public_config(&self) -> PublicConfig {
        PublicConfig {
            site_title: self.site.title.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            lang: self.site.lang.clone(),
            sorting_albums: self.site.sorting_albums.clone(),
            sorting_photos: self.site.sorting_photos.clone(),
            public_search: self.site.public_search,
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_file_size: self.uploads.max_file_size,
        }
    }

    pub fn recent_window(&self) -> anyhow::Result<TimeDelta> {
        let days = self.catalog.recent_days;
        anyhow::ensure!(days >= 0, "catalog.recent_days must not be negative, got {days}");
        TimeDelta::try_days(days)
            .ok_or_else(|| anyhow::anyhow!("catalog.recent_days is out of range, got {days}"))
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

pub fn load() -> anyhow::Result<Config> {
    let mut figment = Figment::new().merge(Toml::file("config.toml"));

    match dirs::config_dir() {
        Some(dir) => figment = figment.merge(Toml::file(dir.join("gallery").join("config.toml"))),
        None => tracing::warn!("no user config directory, skipping per-user config file"),
    }

    extract(figment.merge(Env::prefixed("GALLERY_").split("__")))
}

fn extract(figment: Figment) -> anyhow::Result<Config> {
    let config: Config = figment.extract()?;
    config.recent_window()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_sources() {
        let config = extract(Figment::new()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!(!config.demo.gen_demo_js.is_enabled());
        assert_eq!(config.uploads.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.recent_window().unwrap(), TimeDelta::days(7));
    }

    #[test]
    fn reads_toml() {
        let config = extract(Figment::new().merge(Toml::string(
            r#"
            [site]
            title = "Holidays"

            [demo]
            gen_demo_js = "1"

            [uploads]
            max_file_size = 1024

            [[users]]
            id = 3
            username = "ada"
            may_upload = true
            "#,
        )))
        .unwrap();

        assert_eq!(config.site.title, "Holidays");
        assert_eq!(config.site.lang, "en");
        assert!(config.demo.gen_demo_js.is_enabled());
        assert_eq!(config.upload_policy().max_file_size, 1024);
        assert!(config.user(UserId::from(3)).is_some_and(|u| u.may_upload));
        assert!(config.user(UserId::from(4)).is_none());
    }

    #[test]
    fn flag_accepts_zero() {
        let config = extract(Figment::new().merge(Toml::string("[demo]\ngen_demo_js = 0")))
            .unwrap();
        assert!(!config.demo.gen_demo_js.is_enabled());
    }

    #[test]
    fn rejects_negative_recent_days() {
        let err = extract(Figment::new().merge(Toml::string("[catalog]\nrecent_days = -1")))
            .unwrap_err();
        assert!(err.to_string().contains("recent_days"));
    }

    #[test]
    fn rejects_recent_days_out_of_range() {
        let err = extract(Figment::new().merge(Toml::string(&format!(
            "[catalog]\nrecent_days = {}",
            i64::MAX
        ))))
        .unwrap_err();
        assert!(err.to_string().contains("recent_days"));
    }

    #[test]
    fn accepts_recent_days_past_the_calendar() {
        let config = extract(Figment::new().merge(Toml::string(
            "[catalog]\nrecent_days = 1000000000",
        )))
        .unwrap();
        assert_eq!(config.recent_window().unwrap(), TimeDelta::days(1_000_000_000));
    }
}
