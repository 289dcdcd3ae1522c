use core::marker::PhantomData;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};
use log::trace;

use crate::error::ErrorKind;
use crate::traits::Command;

/// Largest single bus write, some SPI transports refuse bigger transfers
pub const MAX_CHUNK_SIZE: usize = 1024;

/// Default pause between two polls of the busy line in ms
pub const DEFAULT_BUSY_POLL_MS: u32 = 10;

/// How long the reset line is held low and the time given to the controller afterwards, in ms
pub(crate) const RESET_HOLD_MS: u32 = 200;

/// Timing and transfer settings of a [`DisplayInterface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceConfig {
    /// Pause before the first and between two polls of the busy line, in ms, at least 1
    pub busy_poll_ms: u32,
    /// Give up waiting for the busy line after this many ms
    ///
    /// `None` waits forever, a panel that never gets ready hangs the caller.
    pub busy_timeout_ms: Option<u32>,
    /// Maximum bytes per bus write for chunked transfers, `1..=MAX_CHUNK_SIZE`
    pub chunk_size: usize,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        InterfaceConfig {
            busy_poll_ms: DEFAULT_BUSY_POLL_MS,
            busy_timeout_ms: None,
            chunk_size: MAX_CHUNK_SIZE,
        }
    }
}

impl InterfaceConfig {
    /// Sets the busy poll interval, at least 1ms so a timeout can expire
    pub fn with_busy_poll_ms(mut self, busy_poll_ms: u32) -> Self {
        self.busy_poll_ms = busy_poll_ms.max(1);
        self
    }

    /// Fails busy waits after `timeout_ms` instead of blocking forever
    pub fn with_busy_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.busy_timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the chunk size, clamped to `1..=MAX_CHUNK_SIZE`
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }
}

/// The Connection Interface of the panel
///
/// Every transaction is framed by the chip select line, which is driven
/// here and not by the bus: a chunked transfer keeps CS low for all of its
/// bus writes so the controller sees one data phase.
pub(crate) struct DisplayInterface<SPI, CS, BUSY, DC, RST> {
    /// SPI
    _spi: PhantomData<SPI>,
    /// Low for selecting the chip
    cs: CS,
    /// Low for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    config: InterfaceConfig,
}

type Result<SPI, CS, BUSY, DC, RST> = core::result::Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>>;

impl<SPI, CS, BUSY, DC, RST> DisplayInterface<SPI, CS, BUSY, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Creates a new `DisplayInterface` struct and deselects the chip
    pub fn new(
        mut cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        config: InterfaceConfig,
    ) -> core::result::Result<Self, ErrorKind<SPI, CS, BUSY, DC, RST>> {
        cs.set_high().map_err(ErrorKind::CsError)?;
        let config = config
            .with_chunk_size(config.chunk_size)
            .with_busy_poll_ms(config.busy_poll_ms);
        Ok(DisplayInterface {
            _spi: PhantomData,
            cs,
            busy,
            dc,
            rst,
            config,
        })
    }

    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Enables direct interaction with the device with the help of [data()](DisplayInterface::data())
    pub fn cmd<T: Command>(&mut self, spi: &mut SPI, command: T) -> Result<SPI, CS, BUSY, DC, RST> {
        trace!(">CMD {} 0x{:02x}", command.label(), command.address());
        // low for commands
        self.dc.set_low().map_err(ErrorKind::DcError)?;

        // Transfer the command over spi
        self.with_cs(spi, |spi| spi.write(&[command.address()]))
    }

    /// Basic function for sending an array of u8-values of data over spi
    ///
    /// All bytes go out in a single bus write.
    pub fn data(&mut self, spi: &mut SPI, data: &[u8]) -> Result<SPI, CS, BUSY, DC, RST> {
        trace!(">DAT size={}", data.len());
        // high for data
        self.dc.set_high().map_err(ErrorKind::DcError)?;

        self.with_cs(spi, |spi| spi.write(data))
    }

    /// Same as [data()](DisplayInterface::data()) but split into bus writes of at
    /// most `chunk_size` bytes, all inside one chip select
    pub fn data_chunked(&mut self, spi: &mut SPI, data: &[u8]) -> Result<SPI, CS, BUSY, DC, RST> {
        trace!(">DAT size={} (chunked)", data.len());
        self.dc.set_high().map_err(ErrorKind::DcError)?;

        let chunk_size = self.config.chunk_size;
        self.with_cs(spi, |spi| {
            for chunk in data.chunks(chunk_size) {
                spi.write(chunk)?;
            }
            Ok(())
        })
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    pub fn cmd_with_data<T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
        data: &[u8],
    ) -> Result<SPI, CS, BUSY, DC, RST> {
        self.cmd(spi, command)?;
        self.data(spi, data)
    }

    /// A [Command](Command) followed by a [chunked](DisplayInterface::data_chunked()) data phase
    pub fn cmd_with_data_chunked<T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
        data: &[u8],
    ) -> Result<SPI, CS, BUSY, DC, RST> {
        self.cmd(spi, command)?;
        self.data_chunked(spi, data)
    }

    /// Sends the same byte `repetitions` times
    ///
    /// The bus sees exactly the writes [data_chunked()](DisplayInterface::data_chunked())
    /// would produce for a buffer filled with `val`.
    pub fn data_x_times(
        &mut self,
        spi: &mut SPI,
        val: u8,
        repetitions: usize,
    ) -> Result<SPI, CS, BUSY, DC, RST> {
        trace!(">DAT size={} (0x{:02x} repeated)", repetitions, val);
        self.dc.set_high().map_err(ErrorKind::DcError)?;

        let chunk = [val; MAX_CHUNK_SIZE];
        let chunk_size = self.config.chunk_size;
        self.with_cs(spi, |spi| {
            let mut remaining = repetitions;
            while remaining > 0 {
                let len = remaining.min(chunk_size);
                spi.write(&chunk[..len])?;
                remaining -= len;
            }
            Ok(())
        })
    }

    // selects the chip around a bus transfer and flushes before deselecting
    //
    // cs is released even if the transfer failed, the transfer error wins
    fn with_cs<F>(&mut self, spi: &mut SPI, f: F) -> Result<SPI, CS, BUSY, DC, RST>
    where
        F: FnOnce(&mut SPI) -> core::result::Result<(), SPI::Error>,
    {
        // activate spi with cs low
        self.cs.set_low().map_err(ErrorKind::CsError)?;
        // transfer spi data
        let result = f(spi).and_then(|_| spi.flush());
        // deativate spi with cs high
        let released = self.cs.set_high();
        result.map_err(ErrorKind::SpiError)?;
        released.map_err(ErrorKind::CsError)
    }

    /// Waits until device isn't busy anymore (busy == HIGH)
    ///
    /// Sleeps one poll interval before the first check. Without a configured
    /// timeout this blocks for as long as the panel keeps the line low.
    pub fn wait_until_idle<DELAY: DelayNs>(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<SPI, CS, BUSY, DC, RST> {
        let poll_ms = self.config.busy_poll_ms;
        let mut waited_ms: u32 = 0;
        delay.delay_ms(poll_ms);
        waited_ms = waited_ms.saturating_add(poll_ms);
        while self.is_busy()? {
            if let Some(timeout_ms) = self.config.busy_timeout_ms {
                if waited_ms >= timeout_ms {
                    return Err(ErrorKind::BusyTimeout { waited_ms });
                }
            }
            delay.delay_ms(poll_ms);
            waited_ms = waited_ms.saturating_add(poll_ms);
        }
        trace!("idle after {} ms", waited_ms);
        Ok(())
    }

    /// Checks if device is still busy
    pub fn is_busy(&mut self) -> core::result::Result<bool, ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.busy.is_low().map_err(ErrorKind::BusyError)
    }

    /// Resets the device.
    ///
    /// Holds the reset line low for 200ms and gives the controller another
    /// 200ms after releasing it.
    pub fn reset<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result<SPI, CS, BUSY, DC, RST> {
        self.rst.set_low().map_err(ErrorKind::RstError)?;
        delay.delay_ms(RESET_HOLD_MS);
        self.rst.set_high().map_err(ErrorKind::RstError)?;
        delay.delay_ms(RESET_HOLD_MS);
        Ok(())
    }
}
