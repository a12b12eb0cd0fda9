//! Geometry for the gallery grids.
//!
//! - `AsymmetricGridLayout` - pixel-exact 2x2 composite with a master cell
//! - `MasonryRowSpanner` - per-item row spans on a fixed-row-height grid
//!
//! Both are pure functions of container geometry and image natural sizes;
//! results are written onto `InlineStyle`s and never cached.

pub mod asymmetric;
pub mod masonry;

pub use asymmetric::{AsymmetricGridLayout, GridLayout};
pub use masonry::MasonryRowSpanner;
