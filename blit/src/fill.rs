use std::ops::Range;

use crate::addressing::{PixelFormat, TileLayout};
use crate::bitwise::Nibbles;
use crate::surface::{Rect, Surface};

/// Fills `rect` with `value`, using the surface's own pixel format.
///
/// The region is clipped against the right and bottom edges only. A start
/// coordinate past the edge gives an empty range and nothing is written.
pub fn fill<B: AsRef<[u8]> + AsMut<[u8]>>(surface: &mut Surface<B>, rect: Rect, value: u8) {
    match surface.format() {
        PixelFormat::Indexed4 => fill_4bit(surface, rect, value),
        PixelFormat::Indexed8 => fill_8bit(surface, rect, value),
    }
}

/// Fills `rect` of a 4bpp surface with the low nibble of `value`.
/// The other pixel sharing each written byte keeps its value.
pub fn fill_4bit<B: AsRef<[u8]> + AsMut<[u8]>>(surface: &mut Surface<B>, rect: Rect, value: u8) {
    debug_assert_eq!(surface.format(), PixelFormat::Indexed4);

    let (columns, rows) = clip(rect, surface.width(), surface.height());
    tracing::trace!("fill 4bpp {value:#x} x={columns:?} y={rows:?}");

    let layout = TileLayout::new(surface.width(), PixelFormat::Indexed4);
    let pixels = surface.pixels_mut();
    for y in rows {
        for x in columns.clone() {
            let location = layout.locate(x, y);
            let byte = &mut pixels[location.byte];
            *byte = byte.with_nibble(location.shift, value);
        }
    }
}

/// Fills `rect` of an 8bpp surface with `value`.
pub fn fill_8bit<B: AsRef<[u8]> + AsMut<[u8]>>(surface: &mut Surface<B>, rect: Rect, value: u8) {
    debug_assert_eq!(surface.format(), PixelFormat::Indexed8);

    let (columns, rows) = clip(rect, surface.width(), surface.height());
    tracing::trace!("fill 8bpp {value:#x} x={columns:?} y={rows:?}");

    let layout = TileLayout::new(surface.width(), PixelFormat::Indexed8);
    let pixels = surface.pixels_mut();
    for y in rows {
        for x in columns.clone() {
            pixels[layout.locate(x, y).byte] = value;
        }
    }
}

/// Clamps the far edges of `rect` to `width` x `height`.
fn clip(rect: Rect, width: u16, height: u16) -> (Range<usize>, Range<usize>) {
    let x_end = (usize::from(rect.x) + usize::from(rect.width)).min(width.into());
    let y_end = (usize::from(rect.y) + usize::from(rect.height)).min(height.into());

    (usize::from(rect.x)..x_end, usize::from(rect.y)..y_end)
}
