//! Command/data protocol sequencer.
//!
//! Owns the `Idle → WindowSet → Streaming → Idle` cycle of a memory write
//! and the book-keeping that keeps the panel's internal address pointer
//! coherent: exact byte accounting per window, the pending-MADCTL reissue
//! after a rotation change, and the rule that ancillary one-shot commands
//! never interleave with a pixel burst.

use log::debug;

use crate::cmd::Command;
use crate::geometry::Rect;
use crate::interface::Interface;
use crate::Error;

/// Sequencer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// No window open; ancillary commands are allowed.
    Idle,
    /// Window address commands sent, memory-write header not yet sent.
    WindowSet,
    /// Mid pixel burst; `remaining` wire bytes are still owed.
    Streaming {
        /// Bytes still expected before the window closes.
        remaining: u32,
    },
}

/// Sequences register writes, window addressing and pixel bursts.
#[derive(Debug)]
pub struct Sequencer {
    state: State,
    pending_madctl: Option<u8>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// A sequencer in the `Idle` state with no pending access-control write.
    pub const fn new() -> Self {
        Sequencer {
            state: State::Idle,
            pending_madctl: None,
        }
    }

    /// Current state.
    pub const fn state(&self) -> State {
        self.state
    }

    /// Record that MADCTL must be re-issued before the next window set.
    /// Called by the geometry layer whenever the rotation changes.
    pub fn set_pending_madctl(&mut self, madctl: u8) {
        self.pending_madctl = Some(madctl);
    }

    /// True while an access-control write is owed to the panel.
    pub const fn madctl_pending(&self) -> bool {
        self.pending_madctl.is_some()
    }

    /// Force the sequencer back to `Idle`, e.g. after an aborted image draw.
    /// The panel's window pointer is undefined afterwards, so the next
    /// operation must open a fresh window (which every operation does).
    pub fn abort(&mut self) {
        self.state = State::Idle;
    }

    /// Open a window for `rect` (logical coordinates) and send the
    /// memory-write header. `expected_bytes` is the exact number of wire
    /// bytes the caller will stream before the window closes.
    pub fn begin_window<DI: Interface>(
        &mut self,
        di: &mut DI,
        rect: Rect,
        colstart: u16,
        rowstart: u16,
        expected_bytes: u32,
    ) -> Result<(), Error> {
        if self.state != State::Idle {
            return Err(Error::ProtocolSequence);
        }
        if rect.w == 0 || rect.h == 0 || expected_bytes == 0 {
            // zero-area window writes would desync the address pointer
            return Err(Error::ProtocolSequence);
        }
        if let Some(madctl) = self.pending_madctl {
            debug!("reissuing MADCTL {:#04x}", madctl);
            self.write(di, Command::MemoryAccessCtrl, &[madctl])?;
            self.pending_madctl = None;
        }
        let xs = rect.x + colstart;
        let xe = rect.max_x() - 1 + colstart;
        let ys = rect.y + rowstart;
        let ye = rect.max_y() - 1 + rowstart;
        debug!("window x {}-{}, y {}-{}, {} bytes", xs, xe, ys, ye, expected_bytes);
        self.write(
            di,
            Command::ColumnAddressSet,
            &[(xs >> 8) as u8, xs as u8, (xe >> 8) as u8, xe as u8],
        )?;
        self.write(
            di,
            Command::RowAddressSet,
            &[(ys >> 8) as u8, ys as u8, (ye >> 8) as u8, ye as u8],
        )?;
        self.state = State::WindowSet;
        self.write(di, Command::MemoryWrite, &[])?;
        self.state = State::Streaming {
            remaining: expected_bytes,
        };
        Ok(())
    }

    /// Stream pixel bytes into the open window.
    pub fn stream<DI: Interface>(&mut self, di: &mut DI, data: &[u8]) -> Result<(), Error> {
        let State::Streaming { remaining } = self.state else {
            return Err(Error::ProtocolSequence);
        };
        if data.len() as u32 > remaining {
            self.state = State::Idle;
            return Err(Error::ProtocolSequence);
        }
        if let Err(e) = di.write_data(data) {
            self.state = State::Idle;
            return Err(Error::Transport(e));
        }
        self.finish_bytes(remaining, data.len() as u32);
        Ok(())
    }

    /// Stream `pattern` repeated `repeats` times into the open window.
    pub fn stream_repeated<DI: Interface>(
        &mut self,
        di: &mut DI,
        pattern: &[u8],
        repeats: u32,
    ) -> Result<(), Error> {
        let State::Streaming { remaining } = self.state else {
            return Err(Error::ProtocolSequence);
        };
        let total = pattern.len() as u32 * repeats;
        if total > remaining {
            self.state = State::Idle;
            return Err(Error::ProtocolSequence);
        }
        if let Err(e) = di.write_data_repeated(pattern, repeats) {
            self.state = State::Idle;
            return Err(Error::Transport(e));
        }
        self.finish_bytes(remaining, total);
        Ok(())
    }

    /// Issue a one-shot command outside any window cycle.
    ///
    /// Rejected while a burst is open: the command byte would be latched as
    /// pixel data. Per the conservative-reset policy the open burst is
    /// abandoned and the sequencer returns to `Idle` without emitting.
    pub fn ancillary<DI: Interface>(
        &mut self,
        di: &mut DI,
        command: Command,
        args: &[u8],
    ) -> Result<(), Error> {
        if self.state != State::Idle {
            self.state = State::Idle;
            return Err(Error::ProtocolSequence);
        }
        debug!("ancillary {:?}", command);
        self.write(di, command, args)?;
        if command == Command::MemoryAccessCtrl {
            self.pending_madctl = None;
        }
        Ok(())
    }

    /// Issue a read command outside any window cycle.
    pub fn read<DI: Interface>(
        &mut self,
        di: &mut DI,
        command: Command,
        buf: &mut [u8],
    ) -> Result<(), Error> {
        if self.state != State::Idle {
            self.state = State::Idle;
            return Err(Error::ProtocolSequence);
        }
        debug!("read {:?} ({} bytes)", command, buf.len());
        di.read_data(command, buf).map_err(Error::Transport)
    }

    fn finish_bytes(&mut self, remaining: u32, sent: u32) {
        let left = remaining - sent;
        self.state = if left == 0 {
            State::Idle
        } else {
            State::Streaming { remaining: left }
        };
    }

    // command write with conservative reset on transport failure
    fn write<DI: Interface>(&mut self, di: &mut DI, command: Command, args: &[u8]) -> Result<(), Error> {
        di.write_command(command, args).map_err(|e| {
            self.state = State::Idle;
            Error::Transport(e)
        })
    }
}
