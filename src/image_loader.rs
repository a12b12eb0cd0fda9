use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageReader;
use tracing::{trace, warn};

use crate::models::ImageRef;

pub fn is_image_path(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(
        ext.as_str(),
        "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif"
    )
}

/// Reads the natural size of the image at `path` from its header.
///
/// The format is sniffed from the content, so a misnamed extension still
/// reads. Pixel data is never decoded.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    ImageReader::open(path)
        .with_context(|| format!("Failed to open image: {:?}", path))?
        .with_guessed_format()
        .with_context(|| format!("Failed to sniff image format: {:?}", path))?
        .into_dimensions()
        .with_context(|| format!("Failed to read dimensions: {:?}", path))
}

/// Starts reading the natural size of `path` on the blocking pool.
///
/// The returned image is pending until the header has been read; read
/// errors resolve it as failed so layout is never blocked on it.
pub fn load_image_ref(path: PathBuf) -> ImageRef {
    let image = ImageRef::pending(path.to_string_lossy());
    let handle = image.clone();
    tokio::task::spawn_blocking(move || match read_dimensions(&path) {
        Ok((width, height)) => {
            trace!(?path, width, height, "Read natural size");
            handle.complete(width, height);
        }
        Err(err) => {
            warn!(?path, error = ?err, "Failed to load image");
            handle.fail();
        }
    });
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageState, NaturalSize};
    use tempfile::tempdir;

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a/B.JPG")));
        assert!(is_image_path(Path::new("c.webp")));
        assert!(!is_image_path(Path::new("notes.md")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn test_read_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portrait.png");
        image::RgbImage::new(20, 30).save(&path).unwrap();

        assert_eq!(read_dimensions(&path).unwrap(), (20, 30));
    }

    #[test]
    fn test_read_dimensions_sniffs_content() {
        let dir = tempdir().unwrap();
        let gif = dir.path().join("anim.gif");
        image::RgbaImage::new(12, 7).save(&gif).unwrap();
        assert_eq!(read_dimensions(&gif).unwrap(), (12, 7));

        let misnamed = dir.path().join("actually_png.jpg");
        image::RgbImage::new(9, 4)
            .save_with_format(&misnamed, image::ImageFormat::Png)
            .unwrap();
        assert_eq!(read_dimensions(&misnamed).unwrap(), (9, 4));

        assert!(read_dimensions(&dir.path().join("missing.png")).is_err());
    }

    #[tokio::test]
    async fn test_load_image_ref_resolves() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(40, 20).save(&path).unwrap();

        let image = load_image_ref(path);
        let state = image.wait_resolved().await;

        assert_eq!(state, ImageState::Loaded(NaturalSize::new(40, 20)));
        assert_eq!(image.layout_aspect(), 0.5);
    }

    #[tokio::test]
    async fn test_unreadable_image_resolves_as_failed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let image = load_image_ref(path);
        assert_eq!(image.wait_resolved().await, ImageState::Failed);
    }
}
