//! Transport boundary between the driver core and the physical bus.
//!
//! The core only ever talks to an [`Interface`]: a byte-stream with a
//! command/data-select discipline. The bundled [`SpiInterface`] drives a
//! 4-wire SPI panel through `embedded-hal` traits; chip-select scoping is
//! owned by the `SpiDevice` transaction.

use display_interface::DisplayError;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::cmd::Command;

/// Byte-oriented transport with command/data framing.
pub trait Interface {
    /// Send a command byte followed by its parameter bytes.
    fn write_command(&mut self, command: Command, args: &[u8]) -> Result<(), DisplayError>;

    /// Send raw pixel data for the currently addressed window.
    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError>;

    /// Send `pattern` back to back `repeats` times.
    ///
    /// The default implementation assembles chunks on the stack so solid
    /// fills do not need a full-width buffer.
    fn write_data_repeated(&mut self, pattern: &[u8], repeats: u32) -> Result<(), DisplayError> {
        if pattern.is_empty() || repeats == 0 {
            return Ok(());
        }
        let mut chunk = [0u8; 128];
        if pattern.len() >= chunk.len() {
            for _ in 0..repeats {
                self.write_data(pattern)?;
            }
            return Ok(());
        }
        let per_chunk = (chunk.len() / pattern.len()).max(1) as u32;
        let fill = (per_chunk as usize).min(repeats as usize) * pattern.len();
        for (i, byte) in chunk[..fill].iter_mut().enumerate() {
            *byte = pattern[i % pattern.len()];
        }
        let mut remaining = repeats;
        while remaining > 0 {
            let take = remaining.min(per_chunk) as usize;
            self.write_data(&chunk[..take * pattern.len()])?;
            remaining -= take as u32;
        }
        Ok(())
    }

    /// Issue a read command and fill `buf` with the response.
    ///
    /// Optional; transports without a read path report
    /// `DataFormatNotImplemented`.
    fn read_data(&mut self, command: Command, buf: &mut [u8]) -> Result<(), DisplayError> {
        let _ = (command, buf);
        Err(DisplayError::DataFormatNotImplemented)
    }
}

/// SPI transport with a dedicated data/command select line.
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiInterface<SPI, DC> {
    /// Create the interface from a configured SPI device and DC pin.
    pub fn new(spi: SPI, dc: DC) -> Self {
        SpiInterface { spi, dc }
    }

    /// Give the bus and pin back to the caller.
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }
}

impl<SPI, DC> Interface for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn write_command(&mut self, command: Command, args: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(&[command.value()])
            .map_err(|_| DisplayError::BusWriteError)?;
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        if !args.is_empty() {
            self.spi.write(args).map_err(|_| DisplayError::BusWriteError)?;
        }
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi.write(data).map_err(|_| DisplayError::BusWriteError)
    }

    fn read_data(&mut self, command: Command, buf: &mut [u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(&[command.value()])
            .map_err(|_| DisplayError::BusWriteError)?;
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi.read(buf).map_err(|_| DisplayError::BusWriteError)
    }
}
