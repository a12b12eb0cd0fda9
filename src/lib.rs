//! Layout engine for image galleries.
//!
//! - `layout` - asymmetric 2x2 composite and masonry row spans
//! - `models` - containers, items, image load state and inline styles
//! - `manager` - load-gated orchestration and lightbox lifecycle
//! - `debounce` - resize coalescing
//! - `lightbox` - seam to the external lightbox plugin

pub mod app;
pub mod debounce;
pub mod error;
pub mod image_loader;
pub mod layout;
pub mod lightbox;
pub mod manager;
pub mod models;

pub use error::{GalleryError, MountError};
pub use manager::{GalleryConfig, GalleryManager, InitReport, Trigger};
