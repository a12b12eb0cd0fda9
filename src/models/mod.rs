pub mod container;
pub mod image_ref;
pub mod style;

pub use container::*;
pub use image_ref::*;
pub use style::*;
