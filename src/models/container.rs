use std::fmt;

use crate::models::{ImageRef, InlineStyle};

/// Identity of a gallery container on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How a container's width is measured on each layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidthMeasure {
    /// A fixed content width in pixels.
    Fixed(f64),
    /// Viewport width minus horizontal inset, optionally capped.
    Fluid { inset: f64, max: Option<f64> },
}

impl WidthMeasure {
    pub fn measure(&self, viewport_width: u32) -> f64 {
        match *self {
            Self::Fixed(width) => width.max(0.0),
            Self::Fluid { inset, max } => {
                let width = (viewport_width as f64 - inset).max(0.0);
                max.map_or(width, |max| width.min(max))
            }
        }
    }
}

/// A clickable gallery entry.
#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub href: String,
    pub image: Option<ImageRef>,
    /// Whether the item matches the lightbox selector.
    pub clickable: bool,
    pub style: InlineStyle,
}

impl GalleryItem {
    pub fn new(href: impl Into<String>, image: Option<ImageRef>) -> Self {
        Self {
            href: href.into(),
            image,
            clickable: true,
            style: InlineStyle::default(),
        }
    }

    /// An item the lightbox selector does not match.
    pub fn decorative(mut self) -> Self {
        self.clickable = false;
        self
    }
}

/// Named slots of the asymmetric 2x2 layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Master,
    Wide,
    Third,
}

#[derive(Debug, Clone, Default)]
pub struct AsymmetricSlots {
    pub master: Option<GalleryItem>,
    pub wide: Option<GalleryItem>,
    pub third: Option<GalleryItem>,
}

impl AsymmetricSlots {
    pub fn new(master: GalleryItem, wide: GalleryItem, third: GalleryItem) -> Self {
        Self {
            master: Some(master),
            wide: Some(wide),
            third: Some(third),
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Option<GalleryItem> {
        match slot {
            Slot::Master => &mut self.master,
            Slot::Wide => &mut self.wide,
            Slot::Third => &mut self.third,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &GalleryItem> {
        [&self.master, &self.wide, &self.third]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut GalleryItem> {
        [&mut self.master, &mut self.wide, &mut self.third]
            .into_iter()
            .filter_map(Option::as_mut)
    }
}

/// Auto-row grid whose items span a computed number of rows.
#[derive(Debug, Clone)]
pub struct MasonryGrid {
    pub columns: u32,
    pub column_gap: f64,
    pub items: Vec<GalleryItem>,
}

impl MasonryGrid {
    pub fn new(columns: u32, column_gap: f64, items: Vec<GalleryItem>) -> Self {
        Self {
            columns: columns.max(1),
            column_gap,
            items,
        }
    }

    /// Rendered width of one column track.
    pub fn item_width(&self, container_width: f64) -> f64 {
        let columns = self.columns.max(1) as f64;
        let gaps = self.column_gap * (columns - 1.0);
        ((container_width - gaps) / columns).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub enum GalleryKind {
    Asymmetric(AsymmetricSlots),
    Masonry(MasonryGrid),
}

/// A gallery region of the page.
#[derive(Debug, Clone)]
pub struct GalleryContainer {
    pub id: ContainerId,
    pub width: WidthMeasure,
    pub visible: bool,
    pub style: InlineStyle,
    pub kind: GalleryKind,
}

impl GalleryContainer {
    pub fn asymmetric(id: impl Into<ContainerId>, width: WidthMeasure, slots: AsymmetricSlots) -> Self {
        Self::with_kind(id.into(), width, GalleryKind::Asymmetric(slots))
    }

    pub fn masonry(id: impl Into<ContainerId>, width: WidthMeasure, grid: MasonryGrid) -> Self {
        Self::with_kind(id.into(), width, GalleryKind::Masonry(grid))
    }

    fn with_kind(id: ContainerId, width: WidthMeasure, kind: GalleryKind) -> Self {
        Self {
            id,
            width,
            visible: true,
            style: InlineStyle::default(),
            kind,
        }
    }

    /// Measured content width; hidden containers measure 0.
    pub fn measured_width(&self, viewport_width: u32) -> f64 {
        if self.visible {
            self.width.measure(viewport_width)
        } else {
            0.0
        }
    }

    pub fn items(&self) -> Box<dyn Iterator<Item = &GalleryItem> + '_> {
        match &self.kind {
            GalleryKind::Asymmetric(slots) => Box::new(slots.items()),
            GalleryKind::Masonry(grid) => Box::new(grid.items.iter()),
        }
    }

    /// Every image referenced by the container, in item order.
    pub fn images(&self) -> Vec<ImageRef> {
        self.items().filter_map(|item| item.image.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluid_width_measure() {
        let measure = WidthMeasure::Fluid {
            inset: 40.0,
            max: Some(1200.0),
        };
        assert_eq!(measure.measure(1060), 1020.0);
        assert_eq!(measure.measure(2000), 1200.0);
        assert_eq!(measure.measure(20), 0.0);
    }

    #[test]
    fn test_hidden_container_measures_zero() {
        let mut container = GalleryContainer::masonry(
            "gallery",
            WidthMeasure::Fixed(900.0),
            MasonryGrid::new(3, 20.0, Vec::new()),
        );
        assert_eq!(container.measured_width(1920), 900.0);
        container.visible = false;
        assert_eq!(container.measured_width(1920), 0.0);
    }

    #[test]
    fn test_masonry_item_width() {
        let grid = MasonryGrid::new(3, 20.0, Vec::new());
        assert_eq!(grid.item_width(940.0), 300.0);
        assert_eq!(MasonryGrid::new(0, 20.0, Vec::new()).columns, 1);
    }

    #[test]
    fn test_images_skip_items_without_image() {
        let items = vec![
            GalleryItem::new("a.jpg", Some(ImageRef::loaded("a.jpg", 10, 10))),
            GalleryItem::new("caption", None),
        ];
        let container = GalleryContainer::masonry(
            "gallery",
            WidthMeasure::Fixed(900.0),
            MasonryGrid::new(3, 20.0, items),
        );
        assert_eq!(container.images().len(), 1);
    }
}
