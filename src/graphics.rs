//! Graphics Support for the framebuffer via embedded-graphics

use crate::color::Color;
use crate::framebuffer::Framebuffer;
use embedded_graphics_core::prelude::*;

/// For use with embedded_grahics
///
/// Pixels outside of the frame are dropped like with every other drawing call.
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> DrawTarget
    for Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    type Color = Color;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        Framebuffer::clear(self, color);
        Ok(())
    }
}

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> OriginDimensions
    for Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}
