//! ST7789 / RM67162 Display Driver Core
//!
//! Driver for SPI-attached TFT and AMOLED panels built around the ST7789
//! command set, including the compatible RM67162 AMOLED controller.
//!
//! ## Architecture
//!
//! The crate separates the protocol plumbing from the drawing surface:
//! - **[`interface`]** is the transport boundary: a byte stream with
//!   command/data framing. [`SpiInterface`](interface::SpiInterface)
//!   drives real hardware through `embedded-hal` traits.
//! - **[`protocol`]** sequences window-address commands and pixel bursts
//!   with exact byte accounting, and owns the rule that one-shot commands
//!   never interleave with an open burst.
//! - **[`driver`]** is the public surface: a [`St7789`](driver::St7789)
//!   device that clips draws to the logical frame of the active rotation,
//!   tracks the dirty bounding box, converts colors through [`color`] and
//!   streams decoded images scanline by scanline through [`decode`].
//!
//! Panel-specific rotation tables and init sequences live under
//! [`displays`], following the rotation tuples the hardware expects.
//!
//! ## Usage
//!
//! ```rust, ignore
//! use st7789_lcd::displays::st7789_240x320;
//! use st7789_lcd::prelude::*;
//!
//! let di = SpiInterface::new(spi, dc);
//! let mut display = st7789_240x320::new(di)?;
//! display.init(&mut delay, st7789_240x320::INIT_SEQUENCE)?;
//!
//! display.fill(Rgb565::BLACK)?;
//! display.pixel(10, 10, Rgb565::RED)?;
//! display.hline(0, 50, 240, Rgb565::BLUE)?;
//! if let Some(bbox) = display.flush_dirty() {
//!     // bbox covers everything drawn above
//! }
//! ```
//!
//! Image draws never materialize a frame: [`blit_image`](driver::St7789::blit_image)
//! pulls one scanline at a time from a [`ScanlineSource`](decode::ScanlineSource)
//! into a reusable scratch ring buffer and streams it straight into the
//! panel window.
#![no_std]
#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

extern crate alloc;

pub use display_interface::DisplayError;

pub mod cmd;
pub mod color;
pub mod decode;
pub mod dirty;
pub mod displays;
pub mod driver;
pub mod geometry;
pub mod interface;
pub mod protocol;
pub mod scratch;

mod flag;
#[cfg(feature = "graphics")]
mod graphics;
#[cfg(test)]
pub(crate) mod testutil;

pub use flag::Madctl;

use decode::DecodeError;

/// Driver errors.
///
/// Clipping against the logical frame is never an error; everything else
/// fails fast, before any transport bytes are emitted for the failed call.
#[derive(Clone, Debug)]
pub enum Error {
    /// Panel configuration rejected at construction
    InvalidConfig,
    /// Rotation index outside the rotation table
    InvalidRotation,
    /// Indexed-color reference beyond the palette bounds
    PaletteIndexOutOfRange,
    /// Command sequencing violation: ancillary command mid-burst,
    /// zero-area window, or byte-count overrun
    ProtocolSequence,
    /// Scratch or draw buffer allocation failed
    OutOfMemory,
    /// The external image decoder failed
    Decode(DecodeError),
    /// The transport reported a failure
    Transport(DisplayError),
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Transport(e)
    }
}

// `DisplayError` does not implement `PartialEq`; its variants carry no
// payload, so comparing discriminants is full equality.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::Decode(a), Error::Decode(b)) => a == b,
            (Error::Transport(a), Error::Transport(b)) => {
                core::mem::discriminant(a) == core::mem::discriminant(b)
            }
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_compare_by_variant() {
        assert_eq!(
            Error::Transport(DisplayError::BusWriteError),
            Error::Transport(DisplayError::BusWriteError)
        );
        assert_ne!(
            Error::Transport(DisplayError::BusWriteError),
            Error::Transport(DisplayError::DCError)
        );
        assert_ne!(Error::Transport(DisplayError::BusWriteError), Error::OutOfMemory);
        assert_ne!(
            Error::Decode(DecodeError::UnexpectedEof),
            Error::Decode(DecodeError::Malformed)
        );
        assert_eq!(Error::from(DisplayError::DCError), Error::Transport(DisplayError::DCError));
    }
}

/// Useful exports
pub mod prelude {
    pub use crate::color::{ColorMode, ColorOrder, Rgb565};
    pub use crate::decode::{Scanline, ScanlineSource, SourceFormat};
    pub use crate::driver::{InitStep, PanelConfig, St7789};
    pub use crate::geometry::{Point, Rect, Rotation, RotationTable};
    pub use crate::interface::{Interface, SpiInterface};
    pub use crate::Error;
}
