//! Width and wrapping helpers shared by layout code.

pub mod width;
pub mod wrap;

pub use width::{grapheme_width, visible_width};
pub use wrap::wrap_line;
