//! Tiled pixel addressing.
//!
//! Surfaces are not stored as scanlines. The buffer is a grid of 8x8 tiles,
//! tiles laid out row-major, and the pixels inside each tile laid out
//! row-major too. This is the same layout the GBA uses for character blocks,
//! so a surface buffer can be copied straight into tile VRAM.
//!
//! ```text
//!   width = 16 (2 tiles per row)
//!
//!   x:  0 ......  7  8 ...... 15
//!     ┌──────────┬──────────┐
//!  y 0│  tile 0  │  tile 1  │   4bpp: 32 bytes per tile
//!  .. │          │          │   8bpp: 64 bytes per tile
//!  y 7│          │          │
//!     ├──────────┼──────────┤
//!  y 8│  tile 2  │  tile 3  │
//!     └──────────┴──────────┘
//! ```
//!
//! In 4bpp mode two horizontally adjacent pixels share one byte: the pixel
//! with the even x coordinate lives in the low nibble, the odd one in the
//! high nibble.
//!
//! Nothing here does bounds checking, callers clip first.

use serde::{Deserialize, Serialize};

/// Side of a tile, in pixels.
pub const TILE_SIZE: usize = 8;

/// Pixel format of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 16 colors, two pixels per byte.
    Indexed4,
    /// 256 colors, one pixel per byte.
    Indexed8,
}

impl PixelFormat {
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Indexed4 => 4,
            Self::Indexed8 => 8,
        }
    }

    /// Bytes taken by one 8x8 tile.
    pub const fn tile_bytes(self) -> usize {
        match self {
            Self::Indexed4 => 32,
            Self::Indexed8 => 64,
        }
    }

    /// Largest value a single pixel can hold.
    pub const fn max_value(self) -> u8 {
        match self {
            Self::Indexed4 => 0xF,
            Self::Indexed8 => 0xFF,
        }
    }

    /// Size in bytes of a buffer holding a `width` x `height` surface.
    /// Partial tiles at the right and bottom edges count as whole tiles.
    pub const fn buffer_len(self, width: u16, height: u16) -> usize {
        tiles_per_row(width) * (height as usize).div_ceil(TILE_SIZE) * self.tile_bytes()
    }

    /// `log2` of the tile size in bytes.
    const fn tile_shift(self) -> u32 {
        match self {
            Self::Indexed4 => 5,
            Self::Indexed8 => 6,
        }
    }
}

/// Number of tiles covering one row of a surface `width` pixels wide.
pub const fn tiles_per_row(width: u16) -> usize {
    (width as usize).div_ceil(TILE_SIZE)
}

/// Where a pixel lives in a tiled buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelLocation {
    /// Offset of the byte holding the pixel.
    pub byte: usize,
    /// Bit position of the pixel inside that byte.
    /// Always `0` for 8bpp; `0` or `4` for 4bpp.
    pub shift: u8,
}

/// Addressing parameters of one surface, computed once and reused for every
/// pixel of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    format: PixelFormat,
    tiles_per_row: usize,
}

impl TileLayout {
    pub const fn new(width: u16, format: PixelFormat) -> Self {
        Self {
            format,
            tiles_per_row: tiles_per_row(width),
        }
    }

    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    pub const fn tiles_per_row(&self) -> usize {
        self.tiles_per_row
    }

    /// Maps `(x, y)` to its byte offset and bit shift.
    ///
    /// 4bpp: `((x>>1)&3) + ((x>>3)<<5) + (((y>>3)*tiles_per_row)<<5) + ((y&7)<<2)`
    ///
    /// 8bpp: `(x&7) + ((x>>3)<<6) + (((y>>3)*tiles_per_row)<<6) + ((y&7)<<3)`
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn locate(&self, x: usize, y: usize) -> PixelLocation {
        let tile_shift = self.format.tile_shift();
        let tile_column = (x >> 3) << tile_shift;
        let tile_row = ((y >> 3) * self.tiles_per_row) << tile_shift;

        match self.format {
            PixelFormat::Indexed4 => PixelLocation {
                byte: ((x >> 1) & 3) + tile_column + tile_row + ((y & 7) << 2),
                shift: ((x & 1) as u8) << 2,
            },
            PixelFormat::Indexed8 => PixelLocation {
                byte: (x & 7) + tile_column + tile_row + ((y & 7) << 3),
                shift: 0,
            },
        }
    }
}

/// One-shot form of [`TileLayout::locate`].
///
/// Loops should build a [`TileLayout`] once instead.
pub const fn locate(x: usize, y: usize, width: u16, format: PixelFormat) -> PixelLocation {
    TileLayout::new(width, format).locate(x, y)
}
