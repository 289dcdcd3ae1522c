//! Square grids of dark/light modules, e.g. a pre-rendered QR code

use core::fmt;

use bit_field::BitField;

use crate::color::Color;
use crate::framebuffer::Framebuffer;

/// Error found while validating module grid data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// The payload holds fewer bits than `side * side`
    PayloadTooShort {
        /// Bits needed for the whole grid
        required_bits: usize,
        /// Bits in the payload
        available_bits: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::PayloadTooShort {
                required_bits,
                available_bits,
            } => write!(
                f,
                "module grid needs {required_bits} bits but the payload only has {available_bits}"
            ),
        }
    }
}

/// A `side × side` grid backed by packed bits
///
/// Modules are stored row by row, MSB first: module `(mx, my)` is bit
/// `my * side + mx` of the payload. A set bit is a dark module.
#[derive(Debug, Clone, Copy)]
pub struct ModuleGrid<'a> {
    bits: &'a [u8],
    side: u32,
}

impl<'a> ModuleGrid<'a> {
    /// Checks that `bits` covers the whole grid, extra bits are ignored
    ///
    /// A `side` whose bit count doesn't fit into `usize` can never be covered
    /// and reports `required_bits` as `usize::MAX`.
    pub fn new(bits: &'a [u8], side: u32) -> Result<Self, GridError> {
        let required_bits = usize::try_from(side)
            .ok()
            .and_then(|side| side.checked_mul(side))
            .unwrap_or(usize::MAX);
        let available_bits = bits.len().saturating_mul(8);
        if available_bits < required_bits || required_bits == usize::MAX {
            return Err(GridError::PayloadTooShort {
                required_bits,
                available_bits,
            });
        }
        Ok(ModuleGrid { bits, side })
    }

    /// Number of modules per row and column
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Whether module `(mx, my)` is dark, `false` outside of the grid
    pub fn is_dark(&self, mx: u32, my: u32) -> bool {
        if mx >= self.side || my >= self.side {
            return false;
        }
        // in range, `new` checked that side * side fits
        let index = my as usize * self.side as usize + mx as usize;
        self.bits
            .get(index / 8)
            .map_or(false, |byte| byte.get_bit(7 - index % 8))
    }
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize>
    Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    /// Draws every module as a `module_px × module_px` block, top left corner at `(x, y)`
    ///
    /// Dark modules are black, light modules are white.
    pub fn draw_module_grid(&mut self, x: i32, y: i32, grid: &ModuleGrid<'_>, module_px: u32) {
        let size = i64::from(module_px);
        for my in 0..grid.side() {
            for mx in 0..grid.side() {
                let color = if grid.is_dark(mx, my) {
                    Color::Black
                } else {
                    Color::White
                };
                let left = i64::from(x) + i64::from(mx) * size;
                let top = i64::from(y) + i64::from(my) * size;
                self.fill_area(left, top, left + size, top + size, color);
            }
        }
    }

    /// Validates `bits` as a `side × side` grid and draws it, see [`ModuleGrid`]
    pub fn draw_module_grid_bits(
        &mut self,
        x: i32,
        y: i32,
        bits: &[u8],
        module_px: u32,
        side: u32,
    ) -> Result<(), GridError> {
        let grid = ModuleGrid::new(bits, side)?;
        self.draw_module_grid(x, y, &grid, module_px);
        Ok(())
    }
}
