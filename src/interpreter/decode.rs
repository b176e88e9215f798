//! Byte-at-a-time decoder. No prefetch, no lookahead, no opcode tables —
//! just the two fetch primitives the interpreter composes per instruction.

use crate::consts::{I32_OPERAND_WIDTH, REGISTER_COUNT};
use crate::error::Status;
use crate::hal::Hal;
use crate::vm::Vm;

impl<'p, H: Hal> Vm<'p, H> {
    /// Read one byte at `pc`, advancing `pc`. Fails with `EndOfStream` if
    /// `pc >= program_size`.
    pub(crate) fn fetch_u8(&mut self) -> Result<u8, Status> {
        let byte = *self.program.get(self.pc).ok_or(Status::EndOfStream)?;
        self.pc += 1;
        Ok(byte)
    }

    /// Read four little-endian bytes, assembling them as an unsigned 32-bit
    /// value then reinterpreting as signed. Any underlying fetch failure
    /// surfaces as `EndOfStream`.
    pub(crate) fn fetch_i32_le(&mut self) -> Result<i32, Status> {
        let mut bytes = [0u8; I32_OPERAND_WIDTH];
        for b in bytes.iter_mut() {
            *b = self.fetch_u8()?;
        }
        Ok(i32::from_le_bytes(bytes))
    }

    /// Validate a decoded register index.
    pub(crate) fn valid_reg(reg: u8) -> Result<usize, Status> {
        let reg = reg as usize;
        if reg < REGISTER_COUNT {
            Ok(reg)
        } else {
            Err(Status::BadRegister)
        }
    }
}
