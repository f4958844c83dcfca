use crate::driver::{InitStep, PanelConfig, St7789, DEFAULT_INIT_SEQUENCE};
use crate::flag::Madctl;
use crate::geometry::{Rotation, RotationTable};
use crate::interface::Interface;
use crate::Error;

/// Physical panel width
pub const WIDTH: u16 = 240;
/// Physical panel height
pub const HEIGHT: u16 = 320;

/// The four quarter-turn orientations. The full-size panel needs no
/// window start offsets in any of them.
pub const ROTATIONS: &[Rotation] = &[
    Rotation { madctl: 0, width: 240, height: 320, colstart: 0, rowstart: 0 },
    Rotation { madctl: Madctl::MX | Madctl::MV, width: 320, height: 240, colstart: 0, rowstart: 0 },
    Rotation { madctl: Madctl::MX | Madctl::MY, width: 240, height: 320, colstart: 0, rowstart: 0 },
    Rotation { madctl: Madctl::MY | Madctl::MV, width: 320, height: 240, colstart: 0, rowstart: 0 },
];

/// Init sequence for this panel. Most 240x320 modules ship with inversion
/// enabled, which [`config`] reflects.
pub const INIT_SEQUENCE: &[InitStep] = DEFAULT_INIT_SEQUENCE;

/// Default configuration for this panel.
pub fn config() -> PanelConfig {
    PanelConfig::new(WIDTH, HEIGHT).with_inversion(true)
}

/// Build a driver for this panel over any transport.
pub fn new<DI: Interface>(di: DI) -> Result<St7789<DI>, Error> {
    St7789::new(di, config(), RotationTable::new(ROTATIONS))
}
