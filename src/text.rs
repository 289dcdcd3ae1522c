//! Opaque bitmap text through an external glyph source
//!
//! The crate ships no fonts. A [`GlyphProvider`] hands out one [`Glyph`] per
//! character and the framebuffer plots it cell by cell, background included.

use crate::color::Color;
use crate::framebuffer::Framebuffer;

/// Widest glyph that can be drawn, columns past it are dropped
pub const MAX_GLYPH_WIDTH: u32 = 64;

/// Bitmap of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'a> {
    /// Height in pixel, used as-is
    pub height: u32,
    /// Width in pixel, clamped to [`MAX_GLYPH_WIDTH`]
    pub width: u32,
    /// One bit pattern per row, `width` bits significant, MSB = leftmost column
    pub rows: &'a [u64],
}

impl<'a> Glyph<'a> {
    /// Whether the logical pixel `(col, row)` is foreground
    ///
    /// `row` 0 is the top of the glyph. With `bottom_up` the provider rows are
    /// stored last row first and are read mirrored. Rows missing from
    /// [`Glyph::rows`] read as background.
    pub fn is_set(&self, col: u32, row: u32, bottom_up: bool) -> bool {
        let width = self.drawn_width();
        if col >= width || row >= self.height {
            return false;
        }
        let index = if bottom_up {
            self.height - 1 - row
        } else {
            row
        };
        match self.rows.get(index as usize) {
            Some(bits) => (bits >> (width - 1 - col)) & 1 == 1,
            None => false,
        }
    }

    /// Width used for plotting and advancing the pen
    pub fn drawn_width(&self) -> u32 {
        self.width.min(MAX_GLYPH_WIDTH)
    }
}

/// Source of glyph bitmaps, e.g. a generated font table
pub trait GlyphProvider {
    /// Identifies a font (family and size) of this provider
    type Font: Copy;

    /// Whether [`Glyph::rows`] lists the bottom row first
    ///
    /// This is true for the Terminus/Shinonome tables this driver was brought
    /// up with. Other sources may differ and have to be checked on a panel.
    const ROWS_BOTTOM_UP: bool = true;

    /// The glyph for `ch`, or a fallback glyph if the font doesn't have one
    fn glyph(&self, font: Self::Font, ch: char) -> Glyph<'_>;
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize>
    Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    /// Draws `text` with its top left corner at `(x, y)`
    ///
    /// Foreground pixels get `color`, background pixels the inverse of it.
    /// Characters are placed next to each other using their own width.
    /// Returns the x position right after the last character, saturated at
    /// `i32::MAX`.
    pub fn draw_text<P: GlyphProvider>(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
        provider: &P,
        font: P::Font,
    ) -> i32 {
        self.draw_text_scaled(x, y, text, color, provider, font, 1)
    }

    /// Same as [`Framebuffer::draw_text`], with every glyph pixel drawn as a
    /// `scale × scale` block
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_scaled<P: GlyphProvider>(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
        provider: &P,
        font: P::Font,
        scale: u32,
    ) -> i32 {
        if scale == 0 {
            return x;
        }
        let scale = i64::from(scale);
        let top = i64::from(y);
        let mut pen = i64::from(x);
        for ch in text.chars() {
            let glyph = provider.glyph(font, ch);
            let width = glyph.drawn_width();
            for row in 0..glyph.height {
                for col in 0..width {
                    let pixel_color = if glyph.is_set(col, row, P::ROWS_BOTTOM_UP) {
                        color
                    } else {
                        color.inverse()
                    };
                    let px = pen + i64::from(col) * scale;
                    let py = top + i64::from(row) * scale;
                    self.fill_area(px, py, px + scale, py + scale, pixel_color);
                }
            }
            pen = pen.saturating_add(i64::from(width) * scale);
        }
        i32::try_from(pen).unwrap_or(i32::MAX)
    }
}
