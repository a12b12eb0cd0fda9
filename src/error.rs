use thiserror::Error;

use crate::models::ContainerId;

/// Raised by a lightbox plugin that refuses to mount.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("lightbox rejected configuration: {0}")]
    Rejected(String),
    #[error("lightbox extension unavailable: {0}")]
    MissingExtension(String),
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("unknown gallery container: {0}")]
    UnknownContainer(ContainerId),
    #[error("container {0} has no named slots")]
    NotAsymmetric(ContainerId),
    #[error("container {0} is not a masonry grid")]
    NotMasonry(ContainerId),
}
