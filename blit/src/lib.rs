//! Blit and fill primitives for indexed-color surfaces stored as 8x8 tiles.
//!
//! Surfaces use the GBA character layout (see [`addressing`]) in either
//! 4 bits per pixel or 8 bits per pixel. The caller owns every buffer; the
//! operations here never allocate and never fail, they clip against the far
//! edges of the destination and write in place.
//!
//! ```
//! use blit::{BlitArea, ColorKey, PaletteOffset, PixelFormat, Point, Rect, Surface};
//!
//! let mut tile = Surface::blank(8, 8, PixelFormat::Indexed4).unwrap();
//! blit::fill(&mut tile, Rect::new(2, 2, 4, 4), 0x3);
//!
//! let mut canvas = Surface::blank(16, 16, PixelFormat::Indexed8).unwrap();
//! let area = BlitArea::new(Point::new(0, 0), Point::new(8, 8), 8, 8);
//! blit::blit_4bit_to_8bit(&tile, &mut canvas, area, ColorKey::new(0), PaletteOffset::new(2));
//!
//! assert_eq!(canvas.pixel(10, 10), 0x23);
//! assert_eq!(canvas.pixel(8, 8), 0x00);
//! ```

pub mod addressing;
#[allow(clippy::module_name_repetitions)]
pub mod blit;
mod bitwise;
pub mod fill;
mod point;
pub mod surface;

pub use addressing::{PixelFormat, PixelLocation, TileLayout, locate};
pub use blit::{
    BlitArea, BlitMode, ColorKey, PaletteOffset, blit, blit_4bit, blit_4bit_opaque,
    blit_4bit_to_8bit,
};
pub use fill::{fill, fill_4bit, fill_8bit};
pub use point::Point;
pub use surface::{Rect, Surface};
