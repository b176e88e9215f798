//! Wire-stable VM status codes.

use thiserror::Error;

/// VM status / error code.
///
/// These discriminants are part of the wire contract: they are written into
/// `last_error`, returned from every fallible operation, and — for
/// `RECV_CMD`'s empty/invalid paths — written into register `r_a`. Do not
/// renumber existing variants.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum Status {
    /// No error.
    #[error("ok")]
    Ok = 0,
    /// The decoder ran past the end of the program buffer.
    #[error("end of instruction stream")]
    EndOfStream = 1,
    /// A decoded register index was `>= REGISTER_COUNT`.
    #[error("register index out of range")]
    BadRegister = 2,
    /// The fetched opcode byte does not name a known instruction.
    #[error("unknown opcode")]
    BadOpcode = 3,
    /// `CALL_BIF`'s `bif` id does not name a known built-in function.
    #[error("unknown BIF id")]
    BadBif = 4,
    /// `CALL_BIF`'s declared `argc` does not match the BIF's required arity.
    #[error("wrong argument count for BIF")]
    BadArgc = 5,
    /// `pop`/`RECV_CMD` was attempted against an empty mailbox.
    #[error("mailbox is empty")]
    MailboxEmpty = 6,
    /// `push` was attempted with an unknown command type.
    #[error("unknown command type")]
    InvalidCommand = 7,
    /// A command or BIF argument failed its domain range check.
    #[error("argument out of range")]
    BadArgument = 8,
    /// `push` was attempted against a full mailbox.
    #[error("mailbox is full")]
    MailboxFull = 9,
}

impl Status {
    /// `true` for [`Status::Ok`].
    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }

    /// The wire-stable `i32` value of this status.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Convenience alias for VM operations.
pub type VmResult<T> = Result<T, Status>;
