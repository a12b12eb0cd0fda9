use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Intrinsic pixel size of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Height over width, or `None` when the width is unknown (zero).
    pub fn aspect(&self) -> Option<f64> {
        if self.width == 0 {
            None
        } else {
            Some(self.height as f64 / self.width as f64)
        }
    }
}

/// Load state of an image. Transitions away from `Pending` happen once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Loaded(NaturalSize),
    Failed,
}

impl ImageState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

struct Inner {
    src: String,
    state: watch::Sender<ImageState>,
}

/// Shared handle to an image resource.
///
/// Clones refer to the same image: completing one clone resolves every
/// waiter on every other clone.
#[derive(Clone)]
pub struct ImageRef {
    inner: Arc<Inner>,
}

impl ImageRef {
    /// An image whose natural size is not known yet.
    pub fn pending(src: impl Into<String>) -> Self {
        Self::with_state(src, ImageState::Pending)
    }

    /// An image that was already decoded when it was discovered.
    pub fn loaded(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self::with_state(src, ImageState::Loaded(NaturalSize::new(width, height)))
    }

    fn with_state(src: impl Into<String>, state: ImageState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self {
            inner: Arc::new(Inner {
                src: src.into(),
                state: tx,
            }),
        }
    }

    pub fn src(&self) -> &str {
        &self.inner.src
    }

    pub fn state(&self) -> ImageState {
        *self.inner.state.borrow()
    }

    pub fn is_resolved(&self) -> bool {
        self.state().is_resolved()
    }

    pub fn natural_size(&self) -> Option<NaturalSize> {
        match self.state() {
            ImageState::Loaded(size) => Some(size),
            _ => None,
        }
    }

    /// Aspect ratio used by the layout passes.
    ///
    /// Failed, pending and zero-width images all report 0.
    pub fn layout_aspect(&self) -> f64 {
        self.natural_size()
            .and_then(|size| size.aspect())
            .unwrap_or(0.0)
    }

    /// Marks the image as decoded. Returns false if it was already resolved.
    pub fn complete(&self, width: u32, height: u32) -> bool {
        self.resolve(ImageState::Loaded(NaturalSize::new(width, height)))
    }

    /// Marks the image as failed. Returns false if it was already resolved.
    pub fn fail(&self) -> bool {
        self.resolve(ImageState::Failed)
    }

    fn resolve(&self, next: ImageState) -> bool {
        self.inner.state.send_if_modified(|state| {
            if state.is_resolved() {
                return false;
            }
            *state = next;
            true
        })
    }

    /// Resolves once the image has loaded or failed. Returns immediately for
    /// images that are already resolved.
    pub async fn wait_resolved(&self) -> ImageState {
        let mut rx = self.inner.state.subscribe();
        // The sender lives as long as `self`, so the wait only ends on a
        // state change.
        let _ = rx.wait_for(ImageState::is_resolved).await;
        self.state()
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef")
            .field("src", &self.inner.src)
            .field("state", &self.state())
            .finish()
    }
}

/// Waits until every image in `images` has loaded or failed.
pub async fn wait_for_all(images: &[ImageRef]) {
    for image in images {
        image.wait_resolved().await;
    }
}
