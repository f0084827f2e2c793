//! Rendering: the display list, text metrics and rasterization.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: hairline strokes with sub-pixel accuracy
//! - **Scanline polygon fill**: 4x vertical supersampling with exact
//!   horizontal coverage, used for thick strokes, markers and areas
//! - **Glyphs**: TrueType coverage from the bundled DejaVu faces, rotated
//!   about the text anchor by inverse mapping
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod glyphs;
mod primitives;
mod raster;
mod scene;
mod text;

pub use primitives::{
    circle_points, draw_line_aa, fill_circle, fill_polygon, stroke_polyline, stroke_segment,
};
pub use raster::rasterize;
pub use scene::{Baseline, Scene, Shape, Stroke, TextAnchor, TextShape};
pub(crate) use text::face_index;
pub use text::{text_height, text_width, FontWeight, ASCENT, DESCENT};
