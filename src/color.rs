//! B/W Color for the panel

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::{BinaryColor, PixelColor};

/// Black and white color of a single pixel
///
/// The controller stores white as a set bit and black as a cleared one,
/// so a freshly allocated buffer of `0xFF` bytes is a white frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Ink, stored as `0`
    Black,
    /// Background, stored as `1`
    #[default]
    White,
}

impl Color {
    /// Get the color encoding of the color for one bit
    pub fn get_bit_value(self) -> u8 {
        match self {
            Color::Black => 0u8,
            Color::White => 1u8,
        }
    }

    /// Gets a full byte of black or white pixels
    pub fn get_byte_value(self) -> u8 {
        match self {
            Color::Black => 0x00,
            Color::White => 0xff,
        }
    }

    /// Parses the lowest bit of `bit`: `0` is black, `1` is white
    pub fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Inverses the given color from Black to White or from White to Black
    pub fn inverse(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// `true` if this color is stored as a set bit
    pub(crate) fn is_set_bit(self) -> bool {
        self == Color::White
    }
}

#[cfg(feature = "graphics")]
impl PixelColor for Color {
    type Raw = ();
}

#[cfg(feature = "graphics")]
impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bit() {
        assert_eq!(Color::Black, Color::from_bit(0u8));
        assert_eq!(Color::White, Color::from_bit(1u8));
        // only the lowest bit counts
        assert_eq!(Color::Black, Color::from_bit(0b10));
        assert_eq!(Color::White, Color::from_bit(0b11));
    }

    #[test]
    fn bit_conversion_black() {
        assert_eq!(Color::from_bit(Color::Black.get_bit_value()), Color::Black);
        assert_eq!(Color::Black.get_byte_value(), 0x00);
    }

    #[test]
    fn bit_conversion_white() {
        assert_eq!(Color::from_bit(Color::White.get_bit_value()), Color::White);
        assert_eq!(Color::White.get_byte_value(), 0xff);
    }

    #[test]
    fn inverse() {
        assert_eq!(Color::Black.inverse(), Color::White);
        assert_eq!(Color::White.inverse(), Color::Black);
        assert_eq!(Color::default(), Color::White);
    }

    #[cfg(feature = "graphics")]
    #[test]
    fn from_binary_color() {
        assert_eq!(Color::from(BinaryColor::On), Color::Black);
        assert_eq!(Color::from(BinaryColor::Off), Color::White);
    }
}
