//! Rectangle copies between tiled surfaces.
//!
//! Two modes are supported:
//!
//! | Mode                | Source | Destination | Written value                  |
//! |---------------------|--------|-------------|--------------------------------|
//! | [`BlitMode::Same`]  | 4bpp   | 4bpp        | source nibble                  |
//! | [`BlitMode::Widen`] | 4bpp   | 8bpp        | `(bank << 4) \| source nibble` |
//!
//! Widening lets a 16-color graphic be drawn into a 256-color surface, the
//! palette bank selecting which group of 16 colors it ends up using.
//!
//! # Clipping
//!
//! Only the far edges of the destination are clipped: the copied extent is
//! `min(width, dst.width - dst.x)` by `min(height, dst.height - dst.y)`. The
//! origins are trusted as given. A destination origin at or past the edge
//! gives an empty extent and the call does nothing. The source rectangle is
//! not clipped at all, it must fit in the source buffer.
//!
//! # Color key
//!
//! Source pixels equal to the [`ColorKey`] are skipped, leaving the
//! destination pixel as it was. [`ColorKey::DISABLED`] turns transparency off
//! and runs a separate loop without the per-pixel compare.

use serde::{Deserialize, Serialize};

use crate::addressing::{PixelFormat, TileLayout};
use crate::bitwise::Nibbles;
use crate::point::Point;
use crate::surface::Surface;

/// Transparent source value for a blit.
///
/// Compared against 4bpp source pixels, so only keys in `0..=15` can ever
/// match. `0xFF` is reserved and means no transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorKey(u8);

impl ColorKey {
    pub const DISABLED: Self = Self(0xFF);

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_disabled(self) -> bool {
        self.0 == Self::DISABLED.0
    }
}

impl Default for ColorKey {
    fn default() -> Self {
        Self::DISABLED
    }
}

impl From<Option<u8>> for ColorKey {
    fn from(key: Option<u8>) -> Self {
        key.map_or(Self::DISABLED, Self::new)
    }
}

/// Palette bank merged into the high nibble of widened pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct PaletteOffset(u8);

impl PaletteOffset {
    /// Only the low nibble of `bank` is kept.
    pub const fn new(bank: u8) -> Self {
        Self(bank & 0xF)
    }

    pub const fn bank(self) -> u8 {
        self.0
    }

    /// Destination byte for a 4bpp source `index`.
    #[inline]
    pub const fn apply(self, index: u8) -> u8 {
        (self.0 << 4) | (index & 0xF)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlitMode {
    /// 4bpp into 4bpp.
    Same,
    /// 4bpp into 8bpp, with the given palette bank.
    Widen(PaletteOffset),
}

/// Source and destination origins of a blit plus the requested size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct BlitArea {
    pub src: Point<u16>,
    pub dst: Point<u16>,
    pub width: u16,
    pub height: u16,
}

impl BlitArea {
    pub const fn new(src: Point<u16>, dst: Point<u16>, width: u16, height: u16) -> Self {
        Self {
            src,
            dst,
            width,
            height,
        }
    }

    /// Number of columns and rows actually copied into a destination of
    /// `dst_width` x `dst_height`. Only the far edges clamp the extent.
    pub fn clipped_extent(&self, dst_width: u16, dst_height: u16) -> (usize, usize) {
        let columns = (i32::from(dst_width) - i32::from(self.dst.x)).min(i32::from(self.width));
        let rows = (i32::from(dst_height) - i32::from(self.dst.y)).min(i32::from(self.height));

        (
            usize::try_from(columns).unwrap_or(0),
            usize::try_from(rows).unwrap_or(0),
        )
    }
}

/// Copies `area` from the 4bpp `src` into `dst`.
///
/// `dst` must be 4bpp for [`BlitMode::Same`] and 8bpp for [`BlitMode::Widen`].
/// This is only checked in debug builds.
pub fn blit<S, D>(
    src: &Surface<S>,
    dst: &mut Surface<D>,
    area: BlitArea,
    color_key: ColorKey,
    mode: BlitMode,
) where
    S: AsRef<[u8]>,
    D: AsRef<[u8]> + AsMut<[u8]>,
{
    debug_assert_eq!(src.format(), PixelFormat::Indexed4);

    let (columns, rows) = area.clipped_extent(dst.width(), dst.height());
    tracing::trace!("blit {mode:?} {area:?} key={color_key:?} -> {columns}x{rows}");
    if columns == 0 || rows == 0 {
        return;
    }

    let run = Run {
        src: area.src.map(usize::from),
        dst: area.dst.map(usize::from),
        columns,
        rows,
    };
    let key = color_key.value();

    match (mode, color_key.is_disabled()) {
        (BlitMode::Same, true) => copy_nibbles::<false, _, _>(src, dst, run, key),
        (BlitMode::Same, false) => copy_nibbles::<true, _, _>(src, dst, run, key),
        (BlitMode::Widen(offset), true) => widen::<false, _, _>(src, dst, run, key, offset),
        (BlitMode::Widen(offset), false) => widen::<true, _, _>(src, dst, run, key, offset),
    }
}

/// Same-format 4bpp copy.
pub fn blit_4bit<S, D>(src: &Surface<S>, dst: &mut Surface<D>, area: BlitArea, color_key: ColorKey)
where
    S: AsRef<[u8]>,
    D: AsRef<[u8]> + AsMut<[u8]>,
{
    blit(src, dst, area, color_key, BlitMode::Same);
}

/// Same-format 4bpp copy with every source pixel drawn.
pub fn blit_4bit_opaque<S, D>(src: &Surface<S>, dst: &mut Surface<D>, area: BlitArea)
where
    S: AsRef<[u8]>,
    D: AsRef<[u8]> + AsMut<[u8]>,
{
    blit_4bit(src, dst, area, ColorKey::DISABLED);
}

/// 4bpp into 8bpp copy, each written byte being `palette_offset.apply(nibble)`.
pub fn blit_4bit_to_8bit<S, D>(
    src: &Surface<S>,
    dst: &mut Surface<D>,
    area: BlitArea,
    color_key: ColorKey,
    palette_offset: PaletteOffset,
) where
    S: AsRef<[u8]>,
    D: AsRef<[u8]> + AsMut<[u8]>,
{
    blit(src, dst, area, color_key, BlitMode::Widen(palette_offset));
}

/// Clipped extent of a blit, in absolute coordinates.
#[derive(Debug, Clone, Copy)]
struct Run {
    src: Point<usize>,
    dst: Point<usize>,
    columns: usize,
    rows: usize,
}

#[inline]
fn read_nibble(pixels: &[u8], layout: &TileLayout, x: usize, y: usize) -> u8 {
    let location = layout.locate(x, y);
    pixels[location.byte].nibble(location.shift)
}

// `KEYED = false` is the fast path: the key compare is compiled out.
fn copy_nibbles<const KEYED: bool, S, D>(src: &Surface<S>, dst: &mut Surface<D>, run: Run, key: u8)
where
    S: AsRef<[u8]>,
    D: AsRef<[u8]> + AsMut<[u8]>,
{
    debug_assert_eq!(dst.format(), PixelFormat::Indexed4);

    let src_layout = TileLayout::new(src.width(), PixelFormat::Indexed4);
    let dst_layout = TileLayout::new(dst.width(), PixelFormat::Indexed4);
    let src_pixels = src.pixels();
    let dst_pixels = dst.pixels_mut();

    for row in 0..run.rows {
        for column in 0..run.columns {
            let value = read_nibble(src_pixels, &src_layout, run.src.x + column, run.src.y + row);
            if KEYED && value == key {
                continue;
            }

            let location = dst_layout.locate(run.dst.x + column, run.dst.y + row);
            let byte = &mut dst_pixels[location.byte];
            *byte = byte.with_nibble(location.shift, value);
        }
    }
}

fn widen<const KEYED: bool, S, D>(
    src: &Surface<S>,
    dst: &mut Surface<D>,
    run: Run,
    key: u8,
    offset: PaletteOffset,
) where
    S: AsRef<[u8]>,
    D: AsRef<[u8]> + AsMut<[u8]>,
{
    debug_assert_eq!(dst.format(), PixelFormat::Indexed8);

    let src_layout = TileLayout::new(src.width(), PixelFormat::Indexed4);
    let dst_layout = TileLayout::new(dst.width(), PixelFormat::Indexed8);
    let src_pixels = src.pixels();
    let dst_pixels = dst.pixels_mut();

    for row in 0..run.rows {
        for column in 0..run.columns {
            let value = read_nibble(src_pixels, &src_layout, run.src.x + column, run.src.y + row);
            if KEYED && value == key {
                continue;
            }

            let location = dst_layout.locate(run.dst.x + column, run.dst.y + row);
            dst_pixels[location.byte] = offset.apply(value);
        }
    }
}
