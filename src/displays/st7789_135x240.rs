use crate::driver::{InitStep, PanelConfig, St7789, DEFAULT_INIT_SEQUENCE};
use crate::flag::Madctl;
use crate::geometry::{Rotation, RotationTable};
use crate::interface::Interface;
use crate::Error;

/// Physical panel width
pub const WIDTH: u16 = 135;
/// Physical panel height
pub const HEIGHT: u16 = 240;

/// The four orientations. The 135x240 glass sits off-center in the
/// controller's 240x320 frame memory, so every orientation carries its own
/// column/row start offsets.
pub const ROTATIONS: &[Rotation] = &[
    Rotation { madctl: 0, width: 135, height: 240, colstart: 52, rowstart: 40 },
    Rotation { madctl: Madctl::MX | Madctl::MV, width: 240, height: 135, colstart: 40, rowstart: 53 },
    Rotation { madctl: Madctl::MX | Madctl::MY, width: 135, height: 240, colstart: 53, rowstart: 40 },
    Rotation { madctl: Madctl::MY | Madctl::MV, width: 240, height: 135, colstart: 40, rowstart: 52 },
];

/// Init sequence for this panel.
pub const INIT_SEQUENCE: &[InitStep] = DEFAULT_INIT_SEQUENCE;

/// Default configuration for this panel.
pub fn config() -> PanelConfig {
    PanelConfig::new(WIDTH, HEIGHT).with_inversion(true)
}

/// Build a driver for this panel over any transport.
pub fn new<DI: Interface>(di: DI) -> Result<St7789<DI>, Error> {
    St7789::new(di, config(), RotationTable::new(ROTATIONS))
}
