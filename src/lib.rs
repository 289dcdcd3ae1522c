//! A Driver for the UC8151C based 2.9" 128x296 b/w E-Ink panel via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! Drawing happens in a [`Framebuffer`] that is owned by the caller and only
//! handed to the panel for a refresh. Next to the [`raster`] primitives there
//! is opaque bitmap [`text`] from any [`GlyphProvider`] and a renderer for
//! square [`module_grid`]s such as pre-rendered QR codes. With the `graphics`
//! feature the framebuffer is also an `embedded-graphics` `DrawTarget`.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - The reference board runs at 2MHz
//! - The chip select line is driven by the driver, pass the bare [`SpiBus`](embedded_hal::spi::SpiBus)
//!
//! ### Other....
//!
//! - The panel supply (power enable line on some boards) has to be switched on
//!   before the driver is created.
//! - Buffersize: a full frame always is [`uc8151::BUFFER_LEN`] bytes.
//! - Nothing is logged unless the application installs a [`log`] logger.
//!
//! # Examples
//!
//! See [`uc8151`].
#![no_std]

#[cfg(feature = "graphics")]
pub mod graphics;

mod traits;

pub mod color;
mod error;
pub mod framebuffer;
pub mod module_grid;
pub mod raster;
pub mod text;

/// Interface for the physical connection between display and the controlling device
mod interface;

pub mod uc8151;

pub use crate::color::Color;
pub use crate::error::ErrorKind;
pub use crate::framebuffer::{buffer_len, Framebuffer};
pub use crate::interface::{InterfaceConfig, DEFAULT_BUSY_POLL_MS, MAX_CHUNK_SIZE};
pub use crate::module_grid::{GridError, ModuleGrid};
pub use crate::text::{Glyph, GlyphProvider};
pub use crate::uc8151::{PanelState, Uc8151};

/// Includes everything important besides the chosen panel module
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::error::ErrorKind;
    pub use crate::framebuffer::Framebuffer;
    pub use crate::interface::InterfaceConfig;
    pub use crate::module_grid::{GridError, ModuleGrid};
    pub use crate::text::{Glyph, GlyphProvider};
    pub use crate::SPI_MODE;
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
