use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::image_loader::{is_image_path, load_image_ref};
use crate::lightbox::TracingLightbox;
use crate::manager::{GalleryConfig, GalleryManager, Trigger};
use crate::models::{AsymmetricSlots, ContainerId, GalleryContainer, GalleryItem, MasonryGrid, WidthMeasure};

const FEATURED_ID: &str = "featured";
const GALLERY_ID: &str = "gallery";

/// Horizontal page padding around the galleries.
const PAGE_INSET: f64 = 40.0;
const MAX_CONTENT_WIDTH: f64 = 1200.0;
const MASONRY_COLUMNS: u32 = 3;

/// Lays out the images of one directory and prints the resulting styles.
pub struct GalleryApp {
    root: PathBuf,
    viewport_width: u32,
}

impl GalleryApp {
    pub fn new(root: PathBuf, viewport_width: u32) -> Self {
        Self {
            root,
            viewport_width,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let manager = self.lay_out().await?;
        for id in manager.container_ids() {
            if let Some(container) = manager.container(&id) {
                print_container(&container);
            }
        }
        manager.destroy();
        Ok(())
    }

    /// Builds the galleries for the directory and runs them through page
    /// initialization.
    pub async fn lay_out(&self) -> Result<GalleryManager> {
        let paths = discover_images(&self.root)?;
        if paths.is_empty() {
            bail!("No images found in {:?}", self.root);
        }
        info!(count = paths.len(), root = ?self.root, "Discovered images");

        let config = GalleryConfig {
            viewport_width: self.viewport_width,
            ..Default::default()
        };
        let manager = GalleryManager::new(config, Some(Arc::new(TracingLightbox::new())));
        for container in build_containers(&paths) {
            manager.add_container(container);
        }

        let (tx, rx) = flume::unbounded();
        tx.send(Trigger::PageReady)
            .context("Trigger channel closed before start")?;
        drop(tx);
        manager.run(rx).await;
        Ok(manager)
    }
}

fn discover_images(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", root))?;
        if entry.file_type().is_file() && is_image_path(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    debug!(count = paths.len(), "Image scan complete");
    Ok(paths)
}

/// One asymmetric gallery from the first three images, one masonry grid
/// from all of them.
fn build_containers(paths: &[PathBuf]) -> Vec<GalleryContainer> {
    let width = WidthMeasure::Fluid {
        inset: PAGE_INSET,
        max: Some(MAX_CONTENT_WIDTH),
    };
    let item = |path: &PathBuf| {
        GalleryItem::new(path.to_string_lossy(), Some(load_image_ref(path.clone())))
    };

    let mut containers = Vec::with_capacity(2);
    if let [master, wide, third, ..] = paths {
        containers.push(GalleryContainer::asymmetric(
            ContainerId::new(FEATURED_ID),
            width,
            AsymmetricSlots::new(item(master), item(wide), item(third)),
        ));
    }
    containers.push(GalleryContainer::masonry(
        ContainerId::new(GALLERY_ID),
        width,
        MasonryGrid::new(MASONRY_COLUMNS, 20.0, paths.iter().map(item).collect()),
    ));
    containers
}

fn print_container(container: &GalleryContainer) {
    println!("#{} {{ {} }}", container.id, container.style.to_css());
    for item in container.items() {
        println!("  {} {{ {} }}", item.href, item.style.to_css());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discover_images_filters_and_sorts() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), b"").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let paths = discover_images(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[tokio::test]
    async fn test_build_containers() {
        let paths: Vec<PathBuf> = ["1.png", "2.png"].iter().map(PathBuf::from).collect();
        let containers = build_containers(&paths);
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].id.as_str(), GALLERY_ID);

        let paths: Vec<PathBuf> = ["1.png", "2.png", "3.png", "4.png"]
            .iter()
            .map(PathBuf::from)
            .collect();
        let containers = build_containers(&paths);
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[1].items().count(), 4);
    }

    #[tokio::test]
    async fn test_lay_out_directory() {
        let dir = tempdir().unwrap();
        image::RgbImage::new(30, 40).save(dir.path().join("1.png")).unwrap();
        image::RgbImage::new(40, 20).save(dir.path().join("2.png")).unwrap();
        image::RgbImage::new(40, 30).save(dir.path().join("3.png")).unwrap();

        // 1060px viewport less the page inset gives a 1020px container.
        let app = GalleryApp::new(dir.path().to_path_buf(), 1060);
        let manager = app.lay_out().await.unwrap();

        let featured = manager.container(&ContainerId::new(FEATURED_ID)).unwrap();
        assert_eq!(featured.style.grid_template_columns, Some(vec![660, 320]));
        assert_eq!(featured.style.grid_template_rows, Some(vec![160, 240]));
        let master = featured.items().next().unwrap();
        assert_eq!((master.style.width, master.style.height), (Some(660), Some(420)));

        // Three 326.67px columns on a 30px row pitch.
        let gallery = manager.container(&ContainerId::new(GALLERY_ID)).unwrap();
        let spans: Vec<_> = gallery.items().map(|item| item.style.row_span).collect();
        assert_eq!(spans, vec![Some(16), Some(7), Some(9)]);
        assert_eq!(manager.active_instances(), 2);

        app.run().await.unwrap();
    }

    #[tokio::test]
    async fn test_run_rejects_empty_directory() {
        let dir = tempdir().unwrap();
        let app = GalleryApp::new(dir.path().to_path_buf(), 1060);
        assert!(app.run().await.is_err());
    }
}
