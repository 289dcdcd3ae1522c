//! Packed 1 bit per pixel framebuffer
//!
//! Pixels are stored row after row without any per line padding,
//! most significant bit first:
//!
//! - `byte = (y * WIDTH + x) / 8`
//! - `bit  = 7 - x % 8`
//!
//! A cleared bit is black, a set bit is white. The bit position only depends
//! on `x`, so the width has to be a multiple of 8.

use bit_field::BitField;

use crate::color::Color;

/// Number of bytes needed to store `width * height` pixels at one bit each
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width * height + 7) / 8
}

/// Framebuffer with its size fixed at compile time
///
/// - WIDTH: width in pixel
/// - HEIGHT: height in pixel
/// - BYTECOUNT: this is redundant with the previous data and should be removed
///   when const generic expressions are stabilized, use [`buffer_len`]
///
/// All drawing methods ignore pixels outside of the frame, so shapes may be
/// positioned partly (or entirely) off-screen.
pub struct Framebuffer<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> {
    buffer: [u8; BYTECOUNT],
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> Default
    for Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    // inline is necessary here to allow heap allocation via Box on stack limited programs
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize>
    Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    const GEOMETRY_OK: () = assert!(
        WIDTH % 8 == 0 && BYTECOUNT >= buffer_len(WIDTH as usize, HEIGHT as usize),
        "width must be a multiple of 8 and BYTECOUNT must hold every pixel"
    );

    /// A white frame
    #[inline(always)]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::GEOMETRY_OK;
        Self {
            buffer: [Color::White.get_byte_value(); BYTECOUNT],
        }
    }

    /// Width in pixel
    pub fn width(&self) -> u32 {
        WIDTH
    }

    /// Height in pixel
    pub fn height(&self) -> u32 {
        HEIGHT
    }

    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Mutable access to the raw bytes, for callers bringing their own bitmaps
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Fills the whole frame with one color
    pub fn clear(&mut self, color: Color) {
        self.buffer.fill(color.get_byte_value());
    }

    /// Set a specific pixel color on this frame
    ///
    /// Coordinates outside of the frame are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some((index, bit)) = Self::locate(x, y) {
            if let Some(byte) = self.buffer.get_mut(index) {
                byte.set_bit(bit, color.is_set_bit());
            }
        }
    }

    /// Color of a specific pixel, `None` outside of the frame
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (index, bit) = Self::locate(x, y)?;
        let byte = self.buffer.get(index)?;
        Some(Color::from_bit(byte.get_bit(bit) as u8))
    }

    // byte index and bit position (LSB = 0) of a pixel
    fn locate(x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let index = (y * WIDTH as usize + x) / 8;
        let bit = 7 - x % 8;
        Some((index, bit))
    }
}
