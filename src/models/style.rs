use std::fmt::Write;

/// Explicit presentation attributes written by the layout passes.
///
/// This is the only channel through which computed geometry reaches the
/// presentation layer. `None` means "leave it to the stylesheet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub grid_template_columns: Option<Vec<u32>>,
    pub grid_template_rows: Option<Vec<u32>>,
    /// The `--row-span` custom property used by masonry grids.
    pub row_span: Option<u32>,
}

impl InlineStyle {
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = Some(width);
        self.height = Some(height);
    }

    pub fn clear_size(&mut self) {
        self.width = None;
        self.height = None;
    }

    pub fn set_tracks(&mut self, columns: Vec<u32>, rows: Vec<u32>) {
        self.grid_template_columns = Some(columns);
        self.grid_template_rows = Some(rows);
    }

    pub fn clear_tracks(&mut self) {
        self.grid_template_columns = None;
        self.grid_template_rows = None;
    }

    /// True when no explicit sizing is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Renders the style as an inline CSS declaration list.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        if let Some(width) = self.width {
            let _ = write!(css, "width: {width}px; ");
        }
        if let Some(height) = self.height {
            let _ = write!(css, "height: {height}px; ");
        }
        if let Some(columns) = &self.grid_template_columns {
            let _ = write!(css, "grid-template-columns: {}; ", tracks_css(columns));
        }
        if let Some(rows) = &self.grid_template_rows {
            let _ = write!(css, "grid-template-rows: {}; ", tracks_css(rows));
        }
        if let Some(span) = self.row_span {
            let _ = write!(css, "--row-span: {span}; ");
        }
        css.truncate(css.trim_end().len());
        css
    }
}

fn tracks_css(tracks: &[u32]) -> String {
    tracks
        .iter()
        .map(|t| format!("{t}px"))
        .collect::<Vec<_>>()
        .join(" ")
}
