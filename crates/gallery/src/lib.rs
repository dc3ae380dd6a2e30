pub mod album;
pub mod albums;
pub mod catalog;
mod error;
pub mod id;
pub mod photo;
pub mod session;
pub mod smart;
pub mod snapshot;
pub mod transcript;
pub mod upload;
pub mod user;

#[cfg(test)]
mod fixtures;

pub use error::GalleryError;
