use std::error::Error;

use serde::{Deserialize, Deserializer, Serialize};

use crate::addressing::{PixelFormat, TileLayout};
use crate::bitwise::Nibbles;

/// Rectangular region of a surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A tiled pixel buffer.
///
/// The buffer `B` belongs to the caller: it can be a `Vec<u8>`, a borrowed
/// slice of video memory or anything else that derefs to bytes. Blit and fill
/// only ever read or write inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Surface<B = Vec<u8>> {
    width: u16,
    height: u16,
    format: PixelFormat,
    pixels: B,
}

/// Wire form of a [`Surface`], checked by [`Surface::new`] before use.
#[derive(Deserialize)]
#[serde(rename = "Surface")]
struct RawSurface<B> {
    width: u16,
    height: u16,
    format: PixelFormat,
    pixels: B,
}

impl<'de, B> Deserialize<'de> for Surface<B>
where
    B: AsRef<[u8]> + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSurface::<B>::deserialize(deserializer)?;
        Self::new(raw.width, raw.height, raw.format, raw.pixels).map_err(serde::de::Error::custom)
    }
}

impl<B: AsRef<[u8]>> Surface<B> {
    /// Wraps `pixels` as a `width` x `height` surface.
    ///
    /// The buffer must hold at least [`PixelFormat::buffer_len`] bytes.
    /// Extra trailing bytes are allowed and never touched.
    pub fn new(
        width: u16,
        height: u16,
        format: PixelFormat,
        pixels: B,
    ) -> Result<Self, Box<dyn Error>> {
        if width == 0 || height == 0 {
            return Err(
                format!("Surface dimensions must be positive, got {width}x{height}").into(),
            );
        }

        let expected = format.buffer_len(width, height);
        let actual = pixels.as_ref().len();
        if actual < expected {
            return Err(format!(
                "Buffer too small for a {width}x{height} {format:?} surface: expected {expected} bytes but got {actual}"
            )
            .into());
        }

        if width % 8 != 0 || height % 8 != 0 {
            tracing::debug!("{width}x{height} surface is not tile aligned, last tiles are partial");
        }
        tracing::debug!("new {width}x{height} {format:?} surface over {actual} bytes");

        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// The whole surface as a [`Rect`].
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub const fn layout(&self) -> TileLayout {
        TileLayout::new(self.width, self.format)
    }

    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.pixels
    }

    /// Reads the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lands outside the buffer.
    pub fn pixel(&self, x: u16, y: u16) -> u8 {
        let location = self.layout().locate(x.into(), y.into());
        let byte = self.pixels()[location.byte];

        match self.format {
            PixelFormat::Indexed4 => byte.nibble(location.shift),
            PixelFormat::Indexed8 => byte,
        }
    }

    /// Unpacks the surface into scanline order, one byte per pixel.
    pub fn to_linear(&self) -> Vec<u8> {
        let layout = self.layout();
        let pixels = self.pixels();
        let mut linear = Vec::with_capacity(usize::from(self.width) * usize::from(self.height));

        for y in 0..usize::from(self.height) {
            for x in 0..usize::from(self.width) {
                let location = layout.locate(x, y);
                let byte = pixels[location.byte];
                linear.push(match self.format {
                    PixelFormat::Indexed4 => byte.nibble(location.shift),
                    PixelFormat::Indexed8 => byte,
                });
            }
        }

        linear
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Surface<B> {
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.pixels.as_mut()
    }

    /// Writes the pixel at `(x, y)`. For 4bpp surfaces only the low nibble of
    /// `value` is stored and the neighbour sharing the byte is preserved.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lands outside the buffer.
    pub fn set_pixel(&mut self, x: u16, y: u16, value: u8) {
        let location = self.layout().locate(x.into(), y.into());
        let format = self.format;
        let byte = &mut self.pixels_mut()[location.byte];

        *byte = match format {
            PixelFormat::Indexed4 => byte.with_nibble(location.shift, value),
            PixelFormat::Indexed8 => value,
        };
    }
}

impl Surface<Vec<u8>> {
    /// Allocates a zeroed surface.
    pub fn blank(width: u16, height: u16, format: PixelFormat) -> Result<Self, Box<dyn Error>> {
        Self::new(width, height, format, vec![0; format.buffer_len(width, height)])
    }

    /// Packs scanline data (one byte per pixel, `width * height` bytes) into
    /// a new tiled surface.
    pub fn from_linear(
        width: u16,
        height: u16,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<Self, Box<dyn Error>> {
        let expected = usize::from(width) * usize::from(height);
        if data.len() != expected {
            return Err(format!("Expected {expected} pixels but got {}", data.len()).into());
        }

        let mut surface = Self::blank(width, height, format)?;
        for (i, &value) in data.iter().enumerate() {
            // `i < width * height`, both coordinates fit in u16.
            #[allow(clippy::cast_possible_truncation)]
            let (x, y) = ((i % usize::from(width)) as u16, (i / usize::from(width)) as u16);
            surface.set_pixel(x, y, value);
        }

        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn rejects_empty_dimensions() {
        assert!(Surface::blank(0, 8, PixelFormat::Indexed4).is_err());
        assert!(Surface::blank(8, 0, PixelFormat::Indexed8).is_err());
    }

    #[test]
    fn rejects_short_buffer() {
        let err = Surface::new(16, 8, PixelFormat::Indexed4, vec![0_u8; 63]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Buffer too small for a 16x8 Indexed4 surface: expected 64 bytes but got 63"
        );

        assert!(Surface::new(16, 8, PixelFormat::Indexed8, vec![0_u8; 64]).is_err());
    }

    #[test]
    fn accepts_larger_buffer() {
        let surface = Surface::new(8, 8, PixelFormat::Indexed4, [0_u8; 40]).unwrap();
        assert_eq!(surface.pixels().len(), 40);
    }

    #[test]
    fn blank_is_sized_by_tiles() {
        let surface = Surface::blank(12, 12, PixelFormat::Indexed4).unwrap();
        assert_eq!(surface.pixels().len(), 128);

        let surface = Surface::blank(16, 8, PixelFormat::Indexed8).unwrap();
        assert_eq!(surface.pixels().len(), 128);
        assert_eq!(surface.bounds(), Rect::new(0, 0, 16, 8));
    }

    #[test]
    fn set_then_get() {
        let mut surface = Surface::blank(16, 16, PixelFormat::Indexed4).unwrap();
        surface.set_pixel(3, 9, 0x7);
        surface.set_pixel(4, 9, 0x1C);

        assert_eq!(surface.pixel(3, 9), 0x7);
        assert_eq!(surface.pixel(4, 9), 0xC);
        assert_eq!(surface.pixel(2, 9), 0);
        assert_eq!(surface.pixel(5, 9), 0);

        let mut surface = Surface::blank(16, 16, PixelFormat::Indexed8).unwrap();
        surface.set_pixel(15, 15, 0xAB);
        assert_eq!(surface.pixel(15, 15), 0xAB);
        assert_eq!(surface.pixels()[255], 0xAB);
    }

    #[test]
    fn neighbour_nibble_untouched() {
        let mut surface = Surface::blank(8, 8, PixelFormat::Indexed4).unwrap();
        for x in (0..8).step_by(2) {
            surface.set_pixel(x, 0, 0x9);
        }
        for x in (1..8).step_by(2) {
            surface.set_pixel(x, 0, 0x4);
        }
        for x in (0..8).step_by(2) {
            assert_eq!(surface.pixel(x, 0), 0x9);
            assert_eq!(surface.pixel(x + 1, 0), 0x4);
        }
        assert_eq!(&surface.pixels()[..4], &[0x49; 4]);
    }

    #[test]
    fn every_pixel_reads_back() {
        let mut rng = StdRng::seed_from_u64(0x7113);

        for format in [PixelFormat::Indexed4, PixelFormat::Indexed8] {
            let (width, height) = (24, 16);
            let mut surface = Surface::blank(width, height, format).unwrap();
            let mut image = vec![0_u8; usize::from(width) * usize::from(height)];

            for y in 0..height {
                for x in 0..width {
                    let value = rng.gen_range(0..=format.max_value());
                    surface.set_pixel(x, y, value);
                    image[usize::from(y) * usize::from(width) + usize::from(x)] = value;
                }
            }

            for y in 0..height {
                for x in 0..width {
                    assert_eq!(
                        surface.pixel(x, y),
                        image[usize::from(y) * usize::from(width) + usize::from(x)]
                    );
                }
            }
            assert_eq!(surface.to_linear(), image);
        }
    }

    #[test]
    fn linear_round_trip() {
        let image: Vec<u8> = (0..16 * 8).map(|i| (i % 16) as u8).collect();

        let surface = Surface::from_linear(16, 8, PixelFormat::Indexed4, &image).unwrap();
        assert_eq!(surface.to_linear(), image);

        // Row 0 of tile 0 holds x = 0..8: pairs (0,1) (2,3) (4,5) (6,7).
        assert_eq!(&surface.pixels()[..4], &[0x10, 0x32, 0x54, 0x76]);
        // Row 0 of tile 1 starts 32 bytes later with x = 8, 9.
        assert_eq!(surface.pixels()[32], 0x98);
    }

    #[test]
    fn from_linear_checks_length() {
        assert!(Surface::from_linear(8, 8, PixelFormat::Indexed8, &[0; 63]).is_err());
    }

    #[test]
    fn borrowed_buffer() {
        let mut vram = [0_u8; 96];
        {
            let mut surface = Surface::new(8, 8, PixelFormat::Indexed8, &mut vram[32..]).unwrap();
            surface.set_pixel(1, 0, 0x42);
        }
        assert_eq!(vram[33], 0x42);
    }

    #[test]
    fn into_inner_returns_buffer() {
        let mut surface = Surface::blank(8, 8, PixelFormat::Indexed8).unwrap();
        surface.set_pixel(7, 7, 0x99);

        let pixels = surface.into_inner();
        assert_eq!(pixels.len(), 64);
        assert_eq!(pixels[63], 0x99);
    }

    #[test]
    fn json_round_trip() {
        let mut surface = Surface::blank(8, 8, PixelFormat::Indexed4).unwrap();
        surface.set_pixel(3, 5, 0xD);

        let json = serde_json::to_string(&surface).unwrap();
        let back: Surface = serde_json::from_str(&json).unwrap();
        assert_eq!(back, surface);
    }

    #[test]
    fn json_short_buffer_is_rejected() {
        let json = r#"{"width":16,"height":8,"format":"Indexed4","pixels":[0,0,0]}"#;
        let err = serde_json::from_str::<Surface>(json).unwrap_err();
        assert!(err.to_string().starts_with("Buffer too small"), "{err}");
    }

    #[test]
    fn json_empty_dimensions_are_rejected() {
        let json = r#"{"width":0,"height":0,"format":"Indexed8","pixels":[]}"#;
        assert!(serde_json::from_str::<Surface>(json).is_err());

        let json = r#"{"width":8,"height":0,"format":"Indexed4","pixels":[]}"#;
        assert!(serde_json::from_str::<Surface>(json).is_err());
    }
}
