//! SPI Commands for the UC8151C controller
use crate::traits;

/// UC8151C commands
///
/// Only the subset this driver sends. Names follow the controller datasheet,
/// [`Command::label`](traits::Command::label) gives the short form used in logs.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Resolution select, LUT source, B/W or B/W/R mode, scan directions, booster switch and soft reset
    ///
    /// One Byte of Data:
    ///     0x5F 128x296, LUT from OTP, B/W mode, scan up, shift right, booster on, no reset
    PANEL_SETTING = 0x00,
    /// selecting internal and external power
    ///     0x03 VDS_EN, VDG_EN
    ///     0x00 VCOM_HV, VGHL_LV
    ///     0x2b VDH
    ///     0x2b VDL
    ///     0x1e VDHR
    POWER_SETTING = 0x01,
    /// Turns off charge pump, T-con, source and gate driver, VCOM and temperature sensor.
    /// Register data is kept until VDD goes off.
    POWER_OFF = 0x02,
    /// Turning On the Power, busy goes high once the supplies are up
    POWER_ON = 0x04,
    /// Starting data transmission, soft start of the three booster phases
    BOOSTER_SOFT_START = 0x06,
    /// "Old" frame, the first half of a refresh transfer
    DATA_START_TRANSMISSION_1 = 0x10,
    /// Refreshes the panel from the transferred frames, busy goes low for the duration
    DISPLAY_REFRESH = 0x12,
    /// "New" frame, the second half of a refresh transfer
    DATA_START_TRANSMISSION_2 = 0x13,
    /// Oscillator frequency, 0x3C is 50Hz
    PLL_CONTROL = 0x30,
    /// Border output and data polarity plus the interval between VCOM and data
    VCOM_AND_DATA_INTERVAL_SETTING = 0x50,
    /// Gate/source non-overlap period
    TCON_SETTING = 0x60,
    /// Horizontal (one byte) and vertical (two bytes) resolution
    RESOLUTION_SETTING = 0x61,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Command::PANEL_SETTING => "PSR",
            Command::POWER_SETTING => "PWR",
            Command::POWER_OFF => "POF",
            Command::POWER_ON => "PON",
            Command::BOOSTER_SOFT_START => "BTST",
            Command::DATA_START_TRANSMISSION_1 => "DTM1",
            Command::DISPLAY_REFRESH => "DRF",
            Command::DATA_START_TRANSMISSION_2 => "DTM2",
            Command::PLL_CONTROL => "PLL",
            Command::VCOM_AND_DATA_INTERVAL_SETTING => "CDI",
            Command::TCON_SETTING => "TCON",
            Command::RESOLUTION_SETTING => "TRES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Command as CommandTrait;

    #[test]
    fn command_addr() {
        assert_eq!(Command::PANEL_SETTING.address(), 0x00);

        assert_eq!(Command::DISPLAY_REFRESH.address(), 0x12);

        assert_eq!(Command::RESOLUTION_SETTING.address(), 0x61);

        assert_eq!(Command::VCOM_AND_DATA_INTERVAL_SETTING.address(), 0x50);
    }

    #[test]
    fn command_label() {
        assert_eq!(Command::DATA_START_TRANSMISSION_1.label(), "DTM1");
        assert_eq!(Command::DATA_START_TRANSMISSION_2.label(), "DTM2");
        assert_eq!(Command::VCOM_AND_DATA_INTERVAL_SETTING.label(), "CDI");
    }
}
