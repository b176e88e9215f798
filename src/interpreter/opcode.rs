//! Closed set of instruction opcodes.

/// Single-byte opcode, decoded from the program buffer before its operand
/// tail. Mirrors the hex encoding table: a raw byte is converted via
/// [`TryFrom<u8>`], yielding [`crate::Status::BadOpcode`] on an unrecognized
/// value rather than being matched on the raw byte directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr)]
#[repr(u8)]
pub enum Opcode {
    Nop = 0x00,
    ConstI32 = 0x01,
    Move = 0x02,
    Add = 0x03,
    Sub = 0x04,
    CallBif = 0x10,
    RecvCmd = 0x20,
    Jmp = 0x30,
    JmpIfZero = 0x31,
    SleepMs = 0x40,
    Halt = 0xFF,
}

impl TryFrom<u8> for Opcode {
    type Error = crate::error::Status;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Opcode::from_repr(byte).ok_or(crate::error::Status::BadOpcode)
    }
}
