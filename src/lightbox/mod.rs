//! Seam to the external lightbox plugin.
//!
//! The plugin owns presentation and navigation; this crate only decides
//! when to mount it and with which items and configuration.

pub mod config;

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::error::MountError;
use crate::models::{ContainerId, GalleryItem};

pub use config::*;

/// One clickable entry passed to the lightbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxItem {
    pub href: String,
    pub thumbnail: Option<String>,
}

impl From<&GalleryItem> for LightboxItem {
    fn from(item: &GalleryItem) -> Self {
        Self {
            href: item.href.clone(),
            thumbnail: item.image.as_ref().map(|image| image.src().to_string()),
        }
    }
}

/// A mounted lightbox bound to one container.
pub trait LightboxInstance: Send {
    fn destroy(&mut self);
}

/// The external lightbox plugin.
pub trait LightboxPlugin: Send + Sync {
    fn mount(
        &self,
        container: &ContainerId,
        items: &[LightboxItem],
        config: &LightboxConfig,
    ) -> Result<Box<dyn LightboxInstance>, MountError>;
}

/// Plugin that only records mounts in the log.
#[derive(Debug, Default)]
pub struct TracingLightbox {
    next_uid: AtomicU64,
}

impl TracingLightbox {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LightboxPlugin for TracingLightbox {
    fn mount(
        &self,
        container: &ContainerId,
        items: &[LightboxItem],
        config: &LightboxConfig,
    ) -> Result<Box<dyn LightboxInstance>, MountError> {
        let uid = self.next_uid.fetch_add(1, Ordering::Relaxed);
        info!(
            %container,
            uid,
            items = items.len(),
            selector = %config.selector,
            thumbnail = config.thumbnail,
            "Mounted lightbox"
        );
        Ok(Box::new(TracingInstance {
            container: container.clone(),
            uid,
        }))
    }
}

struct TracingInstance {
    container: ContainerId,
    uid: u64,
}

impl LightboxInstance for TracingInstance {
    fn destroy(&mut self) {
        debug!(container = %self.container, uid = self.uid, "Destroyed lightbox");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageRef;

    #[test]
    fn test_item_uses_image_as_thumbnail() {
        let item = GalleryItem::new("full/a.jpg", Some(ImageRef::loaded("thumbs/a.jpg", 10, 10)));
        let lightbox_item = LightboxItem::from(&item);
        assert_eq!(lightbox_item.href, "full/a.jpg");
        assert_eq!(lightbox_item.thumbnail.as_deref(), Some("thumbs/a.jpg"));
    }

    #[test]
    fn test_tracing_lightbox_mounts() {
        let plugin = TracingLightbox::new();
        let items = vec![LightboxItem {
            href: "a.jpg".into(),
            thumbnail: None,
        }];
        let mut instance = plugin
            .mount(&ContainerId::new("gallery"), &items, &LightboxConfig::generic())
            .unwrap();
        instance.destroy();
    }
}
