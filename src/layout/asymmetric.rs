use tracing::trace;

use crate::models::{AsymmetricSlots, InlineStyle};

/// Pixel geometry of the asymmetric 2x2 composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub master_width: u32,
    pub master_height: u32,
    pub right_column_width: u32,
    pub wide_height: u32,
    pub third_height: u32,
    pub column_tracks: [u32; 2],
    pub row_tracks: [u32; 2],
}

/// Layout for a large master cell beside two stacked cells.
///
/// The master cell's height must equal both stacked heights plus the gap,
/// which plain grid flow cannot express when the images' aspect ratios
/// differ, so every size is pinned explicitly.
#[derive(Debug, Clone, Copy)]
pub struct AsymmetricGridLayout {
    /// Gap between cells in pixels (default: 20)
    pub gap: u32,
    /// Viewport widths at or below this use the stylesheet's stacked flow (default: 768)
    pub breakpoint: u32,
}

impl Default for AsymmetricGridLayout {
    fn default() -> Self {
        Self {
            gap: 20,
            breakpoint: 768,
        }
    }
}

impl AsymmetricGridLayout {
    pub fn new(gap: u32, breakpoint: u32) -> Self {
        Self { gap, breakpoint }
    }

    /// Whether the explicit layout applies at this viewport width.
    pub fn is_active(&self, viewport_width: u32) -> bool {
        viewport_width > self.breakpoint
    }

    /// Computes the composite geometry.
    ///
    /// # Algorithm
    /// 1. Split the container into a 2/3 master column and a 1/3 right
    ///    column, each less the gap, floored.
    /// 2. Scale the two right-hand images to the right column width.
    /// 3. Size the master cell to the two stacked heights plus the gap.
    ///
    /// Aspect ratios are height over width. Negative widths clamp to 0 and
    /// a non-finite or negative aspect counts as 0.
    pub fn compute_layout(
        container_width: f64,
        gap: u32,
        wide_aspect: f64,
        third_aspect: f64,
    ) -> GridLayout {
        let gap_px = gap as f64;
        let master_width = floor_px(container_width * 2.0 / 3.0 - gap_px);
        let right_column_width = floor_px(container_width / 3.0 - gap_px);

        // Each row is capped so the master height still fits in a u32.
        let row_cap = (u32::MAX - gap) / 2;
        let wide_height =
            floor_px(right_column_width as f64 * sanitize_aspect(wide_aspect)).min(row_cap);
        let third_height =
            floor_px(right_column_width as f64 * sanitize_aspect(third_aspect)).min(row_cap);
        let master_height = wide_height + third_height + gap;

        GridLayout {
            master_width,
            master_height,
            right_column_width,
            wide_height,
            third_height,
            column_tracks: [master_width, right_column_width],
            row_tracks: [wide_height, third_height],
        }
    }

    /// Writes `layout` onto the three slots and the container tracks.
    ///
    /// Returns false without touching anything when a slot is missing.
    pub fn apply(
        layout: &GridLayout,
        container: &mut InlineStyle,
        slots: &mut AsymmetricSlots,
    ) -> bool {
        let (Some(master), Some(wide), Some(third)) =
            (&mut slots.master, &mut slots.wide, &mut slots.third)
        else {
            return false;
        };

        master.style.set_size(layout.master_width, layout.master_height);
        wide.style.set_size(layout.right_column_width, layout.wide_height);
        third.style.set_size(layout.right_column_width, layout.third_height);
        container.set_tracks(layout.column_tracks.to_vec(), layout.row_tracks.to_vec());

        trace!(?layout, "Applied asymmetric layout");
        true
    }

    /// Clears every explicit size so the stylesheet's responsive flow
    /// takes over again.
    pub fn reset(container: &mut InlineStyle, slots: &mut AsymmetricSlots) {
        for item in slots.items_mut() {
            item.style.clear_size();
        }
        container.clear_tracks();
    }
}

fn floor_px(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u32
    } else {
        0
    }
}

fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GalleryItem, ImageRef};

    fn make_slots() -> AsymmetricSlots {
        AsymmetricSlots::new(
            GalleryItem::new("master.jpg", Some(ImageRef::loaded("master.jpg", 800, 600))),
            GalleryItem::new("wide.jpg", Some(ImageRef::loaded("wide.jpg", 400, 200))),
            GalleryItem::new("third.jpg", Some(ImageRef::loaded("third.jpg", 400, 300))),
        )
    }

    #[test]
    fn test_reference_layout() {
        let layout = AsymmetricGridLayout::compute_layout(1020.0, 20, 0.5, 0.75);

        assert_eq!(layout.right_column_width, 320);
        assert_eq!(layout.master_width, 660);
        assert_eq!(layout.wide_height, 160);
        assert_eq!(layout.third_height, 240);
        assert_eq!(layout.master_height, 420);
        assert_eq!(layout.column_tracks, [660, 320]);
        assert_eq!(layout.row_tracks, [160, 240]);
    }

    #[test]
    fn test_master_height_invariant() {
        let aspects = [0.25, 0.5, 0.5625, 0.75, 1.0, 1.333, 1.5, 3.0];
        for width in (1..=2400).step_by(37) {
            for gap in [0, 8, 20, 33] {
                for &wide in &aspects {
                    for &third in &aspects {
                        let l = AsymmetricGridLayout::compute_layout(width as f64, gap, wide, third);
                        assert_eq!(
                            l.master_height,
                            l.wide_height + l.third_height + gap,
                            "width={width} gap={gap} wide={wide} third={third}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_extreme_aspects_keep_invariant() {
        for gap in [0, 20, u32::MAX] {
            let l = AsymmetricGridLayout::compute_layout(1020.0, gap, 2.0e9, 2.0e9);
            assert_eq!(l.master_height as u64, l.wide_height as u64 + l.third_height as u64 + gap as u64);
        }
        let l = AsymmetricGridLayout::compute_layout(1020.0, 20, 2.0e9, 0.5);
        assert_eq!(l.third_height, 160);
        assert_eq!(l.master_height, l.wide_height + 160 + 20);
    }

    #[test]
    fn test_narrow_container_clamps_to_zero() {
        let layout = AsymmetricGridLayout::compute_layout(30.0, 20, 0.5, 0.5);
        assert_eq!(layout.master_width, 0);
        assert_eq!(layout.right_column_width, 0);
        assert_eq!(layout.master_height, 20);
    }

    #[test]
    fn test_degenerate_aspect_yields_empty_cell() {
        let layout = AsymmetricGridLayout::compute_layout(1020.0, 20, f64::NAN, 0.75);
        assert_eq!(layout.wide_height, 0);
        assert_eq!(layout.master_height, 240 + 20);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let layout = AsymmetricGridLayout::compute_layout(1020.0, 20, 0.5, 0.75);
        let mut container = InlineStyle::default();
        let mut slots = make_slots();

        assert!(AsymmetricGridLayout::apply(&layout, &mut container, &mut slots));
        let first = (container.clone(), slots.clone());

        let again = AsymmetricGridLayout::compute_layout(1020.0, 20, 0.5, 0.75);
        assert_eq!(again, layout);
        assert!(AsymmetricGridLayout::apply(&again, &mut container, &mut slots));

        assert_eq!(container, first.0);
        let before: Vec<_> = first.1.items().map(|i| i.style.clone()).collect();
        let after: Vec<_> = slots.items().map(|i| i.style.clone()).collect();
        assert_eq!(before, after);

        let master = slots.master.as_ref().unwrap();
        assert_eq!(master.style.width, Some(660));
        assert_eq!(master.style.height, Some(420));
        let wide = slots.wide.as_ref().unwrap();
        assert_eq!(wide.style.width, Some(320));
        assert_eq!(wide.style.height, Some(160));
    }

    #[test]
    fn test_apply_with_missing_slot_is_noop() {
        let layout = AsymmetricGridLayout::compute_layout(1020.0, 20, 0.5, 0.75);
        let mut container = InlineStyle::default();
        let mut slots = make_slots();
        slots.third = None;

        assert!(!AsymmetricGridLayout::apply(&layout, &mut container, &mut slots));
        assert!(container.is_empty());
        assert!(slots.items().all(|i| i.style.is_empty()));
    }

    #[test]
    fn test_reset_clears_all_sizing() {
        let layout = AsymmetricGridLayout::compute_layout(1020.0, 20, 0.5, 0.75);
        let mut container = InlineStyle::default();
        let mut slots = make_slots();
        AsymmetricGridLayout::apply(&layout, &mut container, &mut slots);

        AsymmetricGridLayout::reset(&mut container, &mut slots);

        assert!(container.grid_template_columns.is_none());
        assert!(container.grid_template_rows.is_none());
        assert!(slots.items().all(|i| i.style.width.is_none() && i.style.height.is_none()));
    }

    #[test]
    fn test_breakpoint() {
        let layout = AsymmetricGridLayout::default();
        assert!(!layout.is_active(600));
        assert!(!layout.is_active(768));
        assert!(layout.is_active(769));
    }
}
