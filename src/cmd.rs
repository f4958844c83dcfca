//! Controller command set shared by the ST7789 family and the RM67162.

/// Commands understood by the controller.
///
/// The values are fixed by the MIPI DCS / ST7789 datasheet and must match
/// exactly; the RM67162 reuses the same opcodes and adds the brightness pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Empty command
    Nop = 0x00,
    /// Software reset registers (the built-in frame buffer is not affected)
    SwReset = 0x01,
    /// Read 24-bit display ID
    ReadDisplayId = 0x04,
    /// Read display status
    ReadDisplayStatus = 0x09,
    /// Go into sleep mode (DC/DC, oscillator, scanning stopped, but memory keeps content)
    SleepIn = 0x10,
    /// Exit sleep mode
    SleepOut = 0x11,
    /// Turns on partial display mode
    PartialModeOn = 0x12,
    /// Turns on normal display mode
    NormalModeOn = 0x13,
    /// Recover from display inversion
    InversionOff = 0x20,
    /// Go into display inversion mode
    InversionOn = 0x21,
    /// Display off (disable frame buffer output)
    DisplayOff = 0x28,
    /// Display on (enable frame buffer output)
    DisplayOn = 0x29,
    /// Set column address
    ColumnAddressSet = 0x2A,
    /// Set row address
    RowAddressSet = 0x2B,
    /// Write frame memory
    MemoryWrite = 0x2C,
    /// Read frame memory
    MemoryRead = 0x2E,
    /// Define the partial area
    PartialArea = 0x30,
    /// Vertical scrolling definition
    VerticalScrollDefinition = 0x33,
    /// Memory data access control
    MemoryAccessCtrl = 0x36,
    /// Vertical scroll start address
    VerticalScrollStartAddress = 0x37,
    /// Defines the format of RGB picture data
    PixelFormatSet = 0x3A,
    /// Write display brightness (RM67162)
    WriteBrightness = 0x51,
    /// Read display brightness value (RM67162)
    ReadBrightness = 0x52,
    /// Read ID1
    ReadId1 = 0xDA,
    /// Read ID2
    ReadId2 = 0xDB,
    /// Read ID3
    ReadId3 = 0xDC,
    /// Read ID4
    ReadId4 = 0xDD,
}

impl Command {
    /// Opcode byte as sent on the wire.
    pub const fn value(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::Command;

    #[test]
    fn opcodes_match_the_datasheet() {
        assert_eq!(Command::SwReset.value(), 0x01);
        assert_eq!(Command::ColumnAddressSet.value(), 0x2A);
        assert_eq!(Command::RowAddressSet.value(), 0x2B);
        assert_eq!(Command::MemoryWrite.value(), 0x2C);
        assert_eq!(Command::MemoryAccessCtrl.value(), 0x36);
        assert_eq!(Command::PixelFormatSet.value(), 0x3A);
        assert_eq!(Command::WriteBrightness.value(), 0x51);
    }
}
