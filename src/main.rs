use std::path::PathBuf;

use anyhow::{Context, Result};
use gallery_grid::app::GalleryApp;

const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gallery_grid=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let root = args
        .next()
        .map(PathBuf::from)
        .context("usage: gallery-grid <image-dir> [viewport-width]")?;
    let viewport_width = match args.next() {
        Some(width) => width
            .parse()
            .with_context(|| format!("Invalid viewport width: {width}"))?,
        None => DEFAULT_VIEWPORT_WIDTH,
    };

    GalleryApp::new(root, viewport_width).run().await
}
