//! Recording transport mock shared by the unit tests.

use alloc::vec::Vec;

use display_interface::DisplayError;

use crate::cmd::Command;
use crate::interface::Interface;

/// One recorded transport operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Command byte plus its parameter bytes
    Command(u8, Vec<u8>),
    /// Raw pixel data burst
    Data(Vec<u8>),
}

/// Interface that records every operation instead of touching hardware.
#[derive(Debug, Default)]
pub struct MockInterface {
    /// Recorded operations in issue order
    pub ops: Vec<Op>,
    /// When set, every write fails with `BusWriteError`
    pub fail_writes: bool,
}

impl MockInterface {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of pixel data bytes written so far.
    pub fn data_bytes(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Data(bytes) => bytes.len(),
                Op::Command(..) => 0,
            })
            .sum()
    }

    /// The command opcodes in issue order.
    pub fn commands(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(c, _) => Some(*c),
                Op::Data(_) => None,
            })
            .collect()
    }

    /// All pixel data bytes concatenated in issue order.
    pub fn flat_data(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for op in &self.ops {
            if let Op::Data(bytes) = op {
                out.extend_from_slice(bytes);
            }
        }
        out
    }
}

impl Interface for MockInterface {
    fn write_command(&mut self, command: Command, args: &[u8]) -> Result<(), DisplayError> {
        if self.fail_writes {
            return Err(DisplayError::BusWriteError);
        }
        self.ops.push(Op::Command(command.value(), args.to_vec()));
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if self.fail_writes {
            return Err(DisplayError::BusWriteError);
        }
        self.ops.push(Op::Data(data.to_vec()));
        Ok(())
    }

    fn read_data(&mut self, command: Command, buf: &mut [u8]) -> Result<(), DisplayError> {
        if self.fail_writes {
            return Err(DisplayError::BusWriteError);
        }
        self.ops.push(Op::Command(command.value(), Vec::new()));
        buf.fill(0x42);
        Ok(())
    }
}
