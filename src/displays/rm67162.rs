use crate::cmd::Command;
use crate::driver::{InitStep, PanelConfig, St7789};
use crate::flag::Madctl;
use crate::geometry::{Rotation, RotationTable};
use crate::interface::Interface;
use crate::Error;

/// Physical panel width
pub const WIDTH: u16 = 240;
/// Physical panel height
pub const HEIGHT: u16 = 536;

/// The four orientations of the AMOLED glass.
pub const ROTATIONS: &[Rotation] = &[
    Rotation { madctl: 0, width: 240, height: 536, colstart: 0, rowstart: 0 },
    Rotation { madctl: Madctl::MX | Madctl::MV, width: 536, height: 240, colstart: 0, rowstart: 0 },
    Rotation { madctl: Madctl::MX | Madctl::MY, width: 240, height: 536, colstart: 0, rowstart: 0 },
    Rotation { madctl: Madctl::MY | Madctl::MV, width: 536, height: 240, colstart: 0, rowstart: 0 },
];

/// Init sequence for the RM67162. The AMOLED needs no inversion and wakes
/// with brightness at a sane midpoint rather than full off.
pub const INIT_SEQUENCE: &[InitStep] = &[
    InitStep::Cmd(Command::SleepOut),
    InitStep::DelayMs(120),
    InitStep::ColorMode,
    InitStep::MemoryAccessCtrl,
    InitStep::Cmd(Command::DisplayOn),
    InitStep::DelayMs(10),
    InitStep::CmdData(Command::WriteBrightness, &[0xD0]),
];

/// Default configuration for this panel.
pub fn config() -> PanelConfig {
    PanelConfig::new(WIDTH, HEIGHT)
}

/// Build a driver for this panel over any transport.
pub fn new<DI: Interface>(di: DI) -> Result<St7789<DI>, Error> {
    St7789::new(di, config(), RotationTable::new(ROTATIONS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockInterface, Op};
    use alloc::vec;
    use embedded_hal::delay::DelayNs;

    struct NoopDelay;
    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn init_ends_with_a_brightness_write() {
        let mut d = new(MockInterface::new()).unwrap();
        d.init(&mut NoopDelay, INIT_SEQUENCE).unwrap();
        assert_eq!(d.release().ops.last(), Some(&Op::Command(0x51, vec![0xD0])));
    }
}
