use core::fmt::{Debug, Display, Formatter};

use embedded_hal::{digital, spi};

use crate::uc8151::PanelState;

/// Epd error type
pub enum ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    CS: digital::ErrorType,
    BUSY: digital::ErrorType,
    DC: digital::ErrorType,
    RST: digital::ErrorType,
{
    /// Encountered an SPI error
    SpiError(SPI::Error),

    /// Encountered an error on CS GPIO
    CsError(CS::Error),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY::Error),

    /// Encountered an error on DC GPIO
    DcError(DC::Error),

    /// Encountered an error on RST GPIO
    RstError(RST::Error),

    /// The busy line stayed low longer than the configured timeout
    BusyTimeout {
        /// Time spent polling in ms
        waited_ms: u32,
    },

    /// The operation isn't allowed in the current panel state, nothing was sent
    InvalidState {
        /// What was attempted
        operation: &'static str,
        /// Where the panel was
        state: PanelState,
    },

    /// A frame buffer didn't match the panel size
    BufferLength {
        /// Bytes of a full frame
        expected: usize,
        /// Bytes handed in
        actual: usize,
    },
}

impl<SPI, CS, BUSY, DC, RST> ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    CS: digital::ErrorType,
    BUSY: digital::ErrorType,
    DC: digital::ErrorType,
    RST: digital::ErrorType,
{
    /// `true` for [`ErrorKind::BusyTimeout`], the "panel unresponsive" case
    pub fn is_busy_timeout(&self) -> bool {
        matches!(self, Self::BusyTimeout { .. })
    }
}

impl<SPI, CS, BUSY, DC, RST> Display for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    CS: digital::ErrorType,
    BUSY: digital::ErrorType,
    DC: digital::ErrorType,
    RST: digital::ErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "spi error: {err:?}"),
            Self::CsError(err) => write!(f, "cs pin error: {err:?}"),
            Self::BusyError(err) => write!(f, "busy pin error: {err:?}"),
            Self::DcError(err) => write!(f, "dc pin error: {err:?}"),
            Self::RstError(err) => write!(f, "rst pin error: {err:?}"),
            Self::BusyTimeout { waited_ms } => {
                write!(f, "panel unresponsive: still busy after {waited_ms} ms")
            }
            Self::InvalidState { operation, state } => {
                write!(f, "{operation} is not allowed while the panel is {state:?}")
            }
            Self::BufferLength { expected, actual } => {
                write!(f, "frame buffer has {actual} bytes, the panel needs {expected}")
            }
        }
    }
}

impl<SPI, CS, BUSY, DC, RST> Debug for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    CS: digital::ErrorType,
    BUSY: digital::ErrorType,
    DC: digital::ErrorType,
    RST: digital::ErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::CsError(err) => f.debug_tuple("CsError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
            Self::BusyTimeout { waited_ms } => f
                .debug_struct("BusyTimeout")
                .field("waited_ms", waited_ms)
                .finish(),
            Self::InvalidState { operation, state } => f
                .debug_struct("InvalidState")
                .field("operation", operation)
                .field("state", state)
                .finish(),
            Self::BufferLength { expected, actual } => f
                .debug_struct("BufferLength")
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
        }
    }
}
