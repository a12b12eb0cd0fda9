use std::time::Duration;

/// Selector matching the clickable items of asymmetric galleries.
pub const GALLERY_ITEM_SELECTOR: &str = "a.gallery-item";

/// Selector matching every anchor of a masonry gallery.
pub const ANCHOR_SELECTOR: &str = "a";

/// Optional lightbox extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxExtension {
    Zoom,
    Thumbnail,
}

/// Overrides applied on touch devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileSettings {
    pub controls: bool,
    pub show_close_icon: bool,
    pub download: bool,
}

impl Default for MobileSettings {
    fn default() -> Self {
        Self {
            controls: false,
            show_close_icon: true,
            download: false,
        }
    }
}

/// Configuration handed to the lightbox plugin on mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxConfig {
    pub selector: String,
    pub thumbnail: bool,
    pub extensions: Vec<LightboxExtension>,
    /// Transition speed.
    pub speed: Duration,
    pub closable: bool,
    pub counter: bool,
    pub controls: bool,
    pub download: bool,
    /// Number of slides preloaded on each side of the current one.
    pub preload: u32,
    pub show_after_load: bool,
    pub mobile: Option<MobileSettings>,
}

impl LightboxConfig {
    /// Full configuration with zoom and thumbnail strip.
    pub fn full(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            thumbnail: true,
            extensions: vec![LightboxExtension::Zoom, LightboxExtension::Thumbnail],
            speed: Duration::from_millis(400),
            closable: true,
            counter: true,
            controls: true,
            download: false,
            preload: 2,
            show_after_load: true,
            mobile: Some(MobileSettings::default()),
        }
    }

    /// Reduced configuration used when the full one fails to mount.
    pub fn fallback(selector: impl Into<String>) -> Self {
        Self {
            thumbnail: false,
            extensions: Vec::new(),
            mobile: None,
            ..Self::plugin_defaults(selector)
        }
    }

    /// Configuration for masonry galleries: thumbnails on every anchor.
    pub fn generic() -> Self {
        Self {
            thumbnail: true,
            ..Self::plugin_defaults(ANCHOR_SELECTOR)
        }
    }

    fn plugin_defaults(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            thumbnail: false,
            extensions: Vec::new(),
            speed: Duration::from_millis(400),
            closable: true,
            counter: true,
            controls: true,
            download: true,
            preload: 2,
            show_after_load: true,
            mobile: None,
        }
    }
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self::full(GALLERY_ITEM_SELECTOR)
    }
}
