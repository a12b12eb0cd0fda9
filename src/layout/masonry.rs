use tracing::trace;

use crate::models::{ImageRef, ImageState, MasonryGrid};

/// Row-span sizing for a fixed-row-height masonry grid.
///
/// The surrounding grid uses `grid-auto-rows: row_height` with a `row_gap`
/// gap; each item spans enough rows to fit its image at the rendered width.
#[derive(Debug, Clone, Copy)]
pub struct MasonryRowSpanner {
    /// Auto-row track height in pixels (default: 10)
    pub row_height: f64,
    /// Gap between rows in pixels (default: 20)
    pub row_gap: f64,
}

impl Default for MasonryRowSpanner {
    fn default() -> Self {
        Self {
            row_height: 10.0,
            row_gap: 20.0,
        }
    }
}

impl MasonryRowSpanner {
    pub fn new(row_height: f64, row_gap: f64) -> Self {
        Self { row_height, row_gap }
    }

    /// Rows an item of the given width must span. Always at least 1.
    pub fn compute_row_span(item_width: f64, image_aspect: f64, row_height: f64, row_gap: f64) -> u32 {
        let pitch = row_height + row_gap;
        if !(pitch.is_finite() && pitch > 0.0) {
            return 1;
        }
        let item_height = item_width * image_aspect;
        let span = ((item_height + row_gap) / pitch).ceil();
        if span.is_finite() && span >= 1.0 {
            span as u32
        } else {
            1
        }
    }

    /// Sets `--row-span` on every item whose image has resolved.
    ///
    /// Items without an image keep default single-row sizing. Images that
    /// are still pending are returned so the caller can re-run once they
    /// resolve.
    pub fn apply(&self, grid: &mut MasonryGrid, container_width: f64) -> Vec<ImageRef> {
        let item_width = grid.item_width(container_width);
        let mut pending = Vec::new();

        for item in &mut grid.items {
            let Some(image) = &item.image else {
                continue;
            };
            if image.state() == ImageState::Pending {
                pending.push(image.clone());
                continue;
            }
            let span = Self::compute_row_span(
                item_width,
                image.layout_aspect(),
                self.row_height,
                self.row_gap,
            );
            item.style.row_span = Some(span);
        }

        trace!(
            items = grid.items.len(),
            pending = pending.len(),
            item_width,
            "Applied masonry row spans"
        );
        pending
    }
}
