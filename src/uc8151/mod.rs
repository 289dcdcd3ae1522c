//! A Driver for 2.9" 128x296 b/w E-Ink panels with the UC8151C controller via SPI
//!
//! The driver owns the chip select, busy, data/command and reset pins. The
//! SPI bus and the delay are handed in per call.
//!
//! # Example
//!
//!```rust, no_run
//!# use embedded_hal_mock::eh1::*;
//!# fn main() -> Result<(), epd_uc8151::ErrorKind<spi::Mock<u8>, digital::Mock, digital::Mock, digital::Mock, digital::Mock>> {
//!use epd_uc8151::{prelude::*, uc8151::*};
//!#
//!# let expectations = [];
//!# let mut spi = spi::Mock::new(&expectations);
//!# let expectations = [];
//!# let cs_pin = digital::Mock::new(&expectations);
//!# let busy_in = digital::Mock::new(&expectations);
//!# let dc = digital::Mock::new(&expectations);
//!# let rst = digital::Mock::new(&expectations);
//!# let mut delay = delay::NoopDelay::new();
//!
//!// Setup EPD, the panel supply has to be switched on already
//!let mut epd = Uc8151::new(
//!    &mut spi,
//!    cs_pin,
//!    busy_in,
//!    dc,
//!    rst,
//!    &mut delay,
//!    InterfaceConfig::default().with_busy_timeout_ms(10_000),
//!)?;
//!
//!// Get rid of leftovers from the last image
//!epd.deep_clean(&mut spi, &mut delay)?;
//!
//!// Draw into a full frame
//!epd.begin_frame()?;
//!let mut display = Display2in9::default();
//!display.fill_rect(0, 0, 128, 20, Color::Black);
//!display.draw_circle(64, 148, 40, Color::Black, false);
//!
//!// Show it and switch the panel off
//!epd.update_and_display_frame(&mut spi, &mut delay, display.buffer())?;
//!epd.power_off(&mut spi)?;
//!# Ok(())
//!# }
//!```
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};
use log::debug;

use crate::color::Color;
use crate::error::ErrorKind;
use crate::framebuffer::{buffer_len, Framebuffer};
use crate::interface::{DisplayInterface, InterfaceConfig};

pub(crate) mod command;
use self::command::Command;

/// Width of the panel in pixels
pub const WIDTH: u32 = 128;
/// Height of the panel in pixels
pub const HEIGHT: u32 = 296;
/// Bytes of one full frame
pub const BUFFER_LEN: usize = buffer_len(WIDTH as usize, HEIGHT as usize);
/// Default Background Color
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::White;

/// Time the panel is given after a refresh before the next transfer, in ms
const SETTLE_DELAY_MS: u32 = 1000;

/// Full size buffer for use with the 2.9" UC8151C panel
pub type Display2in9 = Framebuffer<WIDTH, HEIGHT, BUFFER_LEN>;

/// Where the panel is in its power and refresh cycle
///
/// `Resetting`, `Configuring`, `DeepCleaning` and `Refreshing` only last for
/// the duration of a call. The driver stays in one of them if the call failed
/// halfway, after that only [`Uc8151::init`] is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Not initialised yet
    Unpowered,
    /// Hardware reset in progress
    Resetting,
    /// Init table is being sent
    Configuring,
    /// Configured and idle
    Ready,
    /// Black/white purge in progress
    DeepCleaning,
    /// The caller is drawing the next frame
    Rendering,
    /// Frame transfer and refresh in progress
    Refreshing,
    /// Power off was sent, needs [`Uc8151::wake_up`]
    PoweredDown,
}

/// One entry of the init table
#[derive(Debug, Clone, Copy)]
pub(crate) struct PanelCommand {
    pub command: Command,
    pub data: &'static [u8],
    /// Wait for the busy line after sending
    pub wait_idle: bool,
}

impl PanelCommand {
    const fn new(command: Command, data: &'static [u8]) -> Self {
        PanelCommand {
            command,
            data,
            wait_idle: false,
        }
    }

    const fn waiting(command: Command) -> Self {
        PanelCommand {
            command,
            data: &[],
            wait_idle: true,
        }
    }
}

/// Sent after every reset
pub(crate) const INIT_SEQUENCE: [PanelCommand; 8] = [
    // 128x296, LUT from OTP, b/w
    PanelCommand::new(Command::PANEL_SETTING, &[0x5F]),
    PanelCommand::new(Command::POWER_SETTING, &[0x03, 0x00, 0x2B, 0x2B, 0x1E]),
    PanelCommand::new(Command::BOOSTER_SOFT_START, &[0x17, 0x17, 0x17]),
    // 50Hz
    PanelCommand::new(Command::PLL_CONTROL, &[0x3C]),
    PanelCommand::waiting(Command::POWER_ON),
    // 128 source, 296 gate
    PanelCommand::new(Command::RESOLUTION_SETTING, &[0x80, 0x01, 0x28]),
    PanelCommand::new(Command::VCOM_AND_DATA_INTERVAL_SETTING, &[0x13]),
    PanelCommand::new(Command::TCON_SETTING, &[0x22]),
];

/// Uc8151 driver
pub struct Uc8151<SPI, CS, BUSY, DC, RST> {
    /// Connection Interface
    interface: DisplayInterface<SPI, CS, BUSY, DC, RST>,
    state: PanelState,
}

type Result<T, SPI, CS, BUSY, DC, RST> = core::result::Result<T, ErrorKind<SPI, CS, BUSY, DC, RST>>;

impl<SPI, CS, BUSY, DC, RST> Uc8151<SPI, CS, BUSY, DC, RST>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Creates the driver and initialises the panel, ends in [`PanelState::Ready`]
    pub fn new<DELAY: DelayNs>(
        spi: &mut SPI,
        cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        delay: &mut DELAY,
        config: InterfaceConfig,
    ) -> Result<Self, SPI, CS, BUSY, DC, RST> {
        let interface = DisplayInterface::new(cs, busy, dc, rst, config)?;
        let mut epd = Uc8151 {
            interface,
            state: PanelState::Unpowered,
        };

        epd.init(spi, delay)?;

        Ok(epd)
    }

    /// Resets the controller and sends the init table
    ///
    /// Accepted in every state, this is also how a driver stuck in a transient
    /// state after a failed call gets back to [`PanelState::Ready`].
    pub fn init<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), SPI, CS, BUSY, DC, RST> {
        self.transition(PanelState::Resetting);
        self.interface.reset(delay)?;
        self.interface.wait_until_idle(delay)?;

        self.transition(PanelState::Configuring);
        for entry in INIT_SEQUENCE.iter() {
            if entry.data.is_empty() {
                self.interface.cmd(spi, entry.command)?;
            } else {
                self.interface.cmd_with_data(spi, entry.command, entry.data)?;
            }
            if entry.wait_idle {
                self.interface.wait_until_idle(delay)?;
            }
        }

        self.transition(PanelState::Ready);
        Ok(())
    }

    /// Drives every pixel fully black and then fully white to get rid of ghosting
    pub fn deep_clean<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), SPI, CS, BUSY, DC, RST> {
        self.require("deep_clean", &[PanelState::Ready])?;
        self.transition(PanelState::DeepCleaning);

        self.interface.cmd(spi, Command::DATA_START_TRANSMISSION_1)?;
        self.interface.data_x_times(spi, 0x00, BUFFER_LEN)?;
        self.interface.cmd(spi, Command::DATA_START_TRANSMISSION_2)?;
        self.interface.data_x_times(spi, 0xFF, BUFFER_LEN)?;
        self.interface.cmd(spi, Command::DISPLAY_REFRESH)?;
        self.interface.wait_until_idle(delay)?;

        self.transition(PanelState::Ready);
        Ok(())
    }

    /// Marks the start of drawing a new frame
    pub fn begin_frame(&mut self) -> Result<(), SPI, CS, BUSY, DC, RST> {
        self.require("begin_frame", &[PanelState::Ready])?;
        self.transition(PanelState::Rendering);
        Ok(())
    }

    /// Transfers a full frame and refreshes the panel with it
    ///
    /// `buffer` has to be [`BUFFER_LEN`] bytes in the [`Framebuffer`] layout.
    /// Blocks until the refresh is done and the panel had time to settle.
    pub fn update_and_display_frame<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        buffer: &[u8],
    ) -> Result<(), SPI, CS, BUSY, DC, RST> {
        self.require(
            "update_and_display_frame",
            &[PanelState::Ready, PanelState::Rendering],
        )?;
        if buffer.len() != BUFFER_LEN {
            return Err(ErrorKind::BufferLength {
                expected: BUFFER_LEN,
                actual: buffer.len(),
            });
        }
        self.transition(PanelState::Refreshing);

        // old frame all white, the controller only drives the difference
        self.interface.cmd(spi, Command::DATA_START_TRANSMISSION_1)?;
        self.interface.data_x_times(spi, 0xFF, BUFFER_LEN)?;
        self.interface
            .cmd_with_data_chunked(spi, Command::DATA_START_TRANSMISSION_2, buffer)?;
        self.interface.cmd(spi, Command::DISPLAY_REFRESH)?;
        self.interface.wait_until_idle(delay)?;
        delay.delay_ms(SETTLE_DELAY_MS);

        self.transition(PanelState::Ready);
        Ok(())
    }

    /// Switches the panel supplies off, the image stays
    pub fn power_off(&mut self, spi: &mut SPI) -> Result<(), SPI, CS, BUSY, DC, RST> {
        self.require("power_off", &[PanelState::Ready])?;
        self.interface.cmd(spi, Command::POWER_OFF)?;
        self.transition(PanelState::PoweredDown);
        Ok(())
    }

    /// Brings a powered down panel back to [`PanelState::Ready`]
    pub fn wake_up<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), SPI, CS, BUSY, DC, RST> {
        self.require("wake_up", &[PanelState::PoweredDown])?;
        self.init(spi, delay)
    }

    /// Timing and transfer settings in use
    pub fn config(&self) -> &InterfaceConfig {
        self.interface.config()
    }

    /// Current state of the panel
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Checks if the busy line reports the panel as busy
    pub fn is_busy(&mut self) -> Result<bool, SPI, CS, BUSY, DC, RST> {
        self.interface.is_busy()
    }

    pub fn width(&self) -> u32 {
        WIDTH
    }

    pub fn height(&self) -> u32 {
        HEIGHT
    }

    fn require(
        &self,
        operation: &'static str,
        allowed: &[PanelState],
    ) -> Result<(), SPI, CS, BUSY, DC, RST> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ErrorKind::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: PanelState) {
        debug!("panel {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::{vec, vec::Vec};

    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    use crate::interface::tests::TotalDelay;
    use crate::interface::MAX_CHUNK_SIZE;

    type TestEpd = Uc8151<SpiMock<u8>, PinMock, PinMock, PinMock, PinMock>;

    /// Expected bus and pin traffic, built up in call order
    #[derive(Default)]
    struct Expect {
        spi: Vec<SpiTransaction<u8>>,
        dc: Vec<PinTransaction>,
        busy: Vec<PinTransaction>,
        rst: Vec<PinTransaction>,
        selects: usize,
    }

    impl Expect {
        fn cmd(&mut self, address: u8) -> &mut Self {
            self.dc.push(PinTransaction::set(PinState::Low));
            self.spi.push(SpiTransaction::write_vec(vec![address]));
            self.spi.push(SpiTransaction::flush());
            self.selects += 1;
            self
        }

        fn data(&mut self, data: &[u8]) -> &mut Self {
            self.dc.push(PinTransaction::set(PinState::High));
            for chunk in data.chunks(MAX_CHUNK_SIZE) {
                self.spi.push(SpiTransaction::write_vec(chunk.to_vec()));
            }
            self.spi.push(SpiTransaction::flush());
            self.selects += 1;
            self
        }

        fn busy_polls(&mut self, busy_reads: usize) -> &mut Self {
            for _ in 0..busy_reads {
                self.busy.push(PinTransaction::get(PinState::Low));
            }
            self.busy.push(PinTransaction::get(PinState::High));
            self
        }

        fn idle(&mut self) -> &mut Self {
            self.busy_polls(0)
        }

        fn init(&mut self) -> &mut Self {
            self.rst.push(PinTransaction::set(PinState::Low));
            self.rst.push(PinTransaction::set(PinState::High));
            self.idle();
            self.cmd(0x00).data(&[0x5F]);
            self.cmd(0x01).data(&[0x03, 0x00, 0x2B, 0x2B, 0x1E]);
            self.cmd(0x06).data(&[0x17, 0x17, 0x17]);
            self.cmd(0x30).data(&[0x3C]);
            self.cmd(0x04).idle();
            self.cmd(0x61).data(&[0x80, 0x01, 0x28]);
            self.cmd(0x50).data(&[0x13]);
            self.cmd(0x60).data(&[0x22])
        }

        fn cs(&self) -> Vec<PinTransaction> {
            let mut cs = vec![PinTransaction::set(PinState::High)];
            for _ in 0..self.selects {
                cs.push(PinTransaction::set(PinState::Low));
                cs.push(PinTransaction::set(PinState::High));
            }
            cs
        }
    }

    struct Harness {
        epd: TestEpd,
        spi: SpiMock<u8>,
        pins: [PinMock; 4],
        delay: TotalDelay,
    }

    impl Harness {
        fn done(mut self) {
            self.spi.done();
            for pin in self.pins.iter_mut() {
                pin.done();
            }
        }
    }

    fn setup(expect: &Expect, config: InterfaceConfig) -> Harness {
        let mut spi = SpiMock::new(&expect.spi);
        let cs = PinMock::new(&expect.cs());
        let busy = PinMock::new(&expect.busy);
        let dc = PinMock::new(&expect.dc);
        let rst = PinMock::new(&expect.rst);
        let mut delay = TotalDelay::default();
        let epd = Uc8151::new(
            &mut spi,
            cs.clone(),
            busy.clone(),
            dc.clone(),
            rst.clone(),
            &mut delay,
            config,
        )
        .unwrap();
        Harness {
            epd,
            spi,
            pins: [cs, busy, dc, rst],
            delay,
        }
    }

    #[test]
    fn epd_size() {
        assert_eq!(WIDTH, 128);
        assert_eq!(HEIGHT, 296);
        assert_eq!(BUFFER_LEN, 4736);
        assert_eq!(DEFAULT_BACKGROUND_COLOR, Color::White);
        assert_eq!(Display2in9::default().buffer().len(), BUFFER_LEN);
    }

    #[test]
    fn init_sequence() {
        let mut expect = Expect::default();
        expect.init();
        let h = setup(&expect, InterfaceConfig::default());
        assert_eq!(h.epd.state(), PanelState::Ready);
        assert_eq!(h.epd.width(), 128);
        assert_eq!(h.epd.height(), 296);
        // two resets holds, one poll after reset and one after power on
        assert_eq!(h.delay.ms(), 400 + 10 + 10);
        h.done();
    }

    #[test]
    fn deep_clean_purges_black_then_white() {
        let mut expect = Expect::default();
        expect.init();
        expect
            .cmd(0x10)
            .data(&[0x00; BUFFER_LEN])
            .cmd(0x13)
            .data(&[0xFF; BUFFER_LEN])
            .cmd(0x12)
            .busy_polls(3);
        let mut h = setup(&expect, InterfaceConfig::default());
        h.epd.deep_clean(&mut h.spi, &mut h.delay).unwrap();
        assert_eq!(h.epd.state(), PanelState::Ready);
        h.done();
    }

    #[test]
    fn display_frame() {
        let mut display = Display2in9::default();
        display.fill_rect(0, 0, 64, 10, Color::Black);
        display.set_pixel(127, 295, Color::Black);

        let mut expect = Expect::default();
        expect.init();
        expect
            .cmd(0x10)
            .data(&[0xFF; BUFFER_LEN])
            .cmd(0x13)
            .data(display.buffer())
            .cmd(0x12)
            .busy_polls(1);
        let mut h = setup(&expect, InterfaceConfig::default());
        let after_init = h.delay.ms();

        h.epd.begin_frame().unwrap();
        assert_eq!(h.epd.state(), PanelState::Rendering);
        h.epd
            .update_and_display_frame(&mut h.spi, &mut h.delay, display.buffer())
            .unwrap();
        assert_eq!(h.epd.state(), PanelState::Ready);
        // two busy polls and the settle time
        assert_eq!(h.delay.ms() - after_init, 20 + 1000);
        h.done();
    }

    #[test]
    fn display_without_begin_frame() {
        let display = Display2in9::default();
        let mut expect = Expect::default();
        expect.init();
        expect
            .cmd(0x10)
            .data(&[0xFF; BUFFER_LEN])
            .cmd(0x13)
            .data(display.buffer())
            .cmd(0x12)
            .idle();
        let mut h = setup(&expect, InterfaceConfig::default());
        h.epd
            .update_and_display_frame(&mut h.spi, &mut h.delay, display.buffer())
            .unwrap();
        assert_eq!(h.epd.state(), PanelState::Ready);
        h.done();
    }

    #[test]
    fn power_cycle() {
        let mut expect = Expect::default();
        expect.init();
        expect.cmd(0x02);
        expect.init();
        let mut h = setup(&expect, InterfaceConfig::default());
        h.epd.power_off(&mut h.spi).unwrap();
        assert_eq!(h.epd.state(), PanelState::PoweredDown);
        h.epd.wake_up(&mut h.spi, &mut h.delay).unwrap();
        assert_eq!(h.epd.state(), PanelState::Ready);
        h.done();
    }

    #[test]
    fn wrong_state_sends_nothing() {
        let mut expect = Expect::default();
        expect.init();
        let mut h = setup(&expect, InterfaceConfig::default());

        let err = h.epd.wake_up(&mut h.spi, &mut h.delay).unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::InvalidState {
                operation: "wake_up",
                state: PanelState::Ready
            }
        ));

        h.epd.begin_frame().unwrap();
        assert!(matches!(
            h.epd.begin_frame(),
            Err(ErrorKind::InvalidState {
                state: PanelState::Rendering,
                ..
            })
        ));
        assert!(matches!(
            h.epd.deep_clean(&mut h.spi, &mut h.delay),
            Err(ErrorKind::InvalidState {
                operation: "deep_clean",
                ..
            })
        ));
        assert!(matches!(
            h.epd.power_off(&mut h.spi),
            Err(ErrorKind::InvalidState { .. })
        ));
        assert_eq!(h.epd.state(), PanelState::Rendering);
        h.done();
    }

    #[test]
    fn frame_size_checked() {
        let mut expect = Expect::default();
        expect.init();
        let mut h = setup(&expect, InterfaceConfig::default());
        let short = [0xFFu8; BUFFER_LEN - 1];
        let err = h
            .epd
            .update_and_display_frame(&mut h.spi, &mut h.delay, &short)
            .unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::BufferLength {
                expected: 4736,
                actual: 4735
            }
        ));
        assert_eq!(h.epd.state(), PanelState::Ready);
        h.done();
    }

    #[test]
    fn busy_timeout_needs_init() {
        let mut expect = Expect::default();
        expect.init();
        expect
            .cmd(0x10)
            .data(&[0x00; BUFFER_LEN])
            .cmd(0x13)
            .data(&[0xFF; BUFFER_LEN])
            .cmd(0x12);
        // 50ms budget at 10ms per poll
        for _ in 0..5 {
            expect.busy.push(PinTransaction::get(PinState::Low));
        }
        expect.init();
        let mut h = setup(&expect, InterfaceConfig::default().with_busy_timeout_ms(50));

        let err = h.epd.deep_clean(&mut h.spi, &mut h.delay).unwrap_err();
        assert!(err.is_busy_timeout());
        assert_eq!(h.epd.state(), PanelState::DeepCleaning);

        // stuck until the next init
        assert!(matches!(
            h.epd.begin_frame(),
            Err(ErrorKind::InvalidState {
                state: PanelState::DeepCleaning,
                ..
            })
        ));
        h.epd.init(&mut h.spi, &mut h.delay).unwrap();
        assert_eq!(h.epd.state(), PanelState::Ready);
        h.done();
    }
}
