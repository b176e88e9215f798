//! VM state record: register file, program counter, halt flag, mailbox.

use crate::command::Command;
use crate::consts::REGISTER_COUNT;
use crate::error::Status;
use crate::hal::Hal;
use crate::mailbox::Mailbox;

/// Two-state state machine: `Running` is the initial state, `Halted` is
/// terminal for the lifetime of the VM instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Halted,
}

/// VM instance: register file, program counter, halt flag, last-error field
/// and mailbox, borrowing an immutable program buffer and owning an
/// injected [`Hal`] capability for the duration of its lifetime.
///
/// The state record exclusively owns the register file, PC, halt flag,
/// last-error field, and mailbox. The program buffer is borrowed; the HAL is
/// held by value (a host wanting to share a HAL across VM instances can
/// implement [`Hal`] on a handle type it clones or wraps in a reference).
#[derive(Debug)]
pub struct Vm<'p, H> {
    pub(crate) program: &'p [u8],
    pub(crate) pc: usize,
    pub(crate) registers: [i32; REGISTER_COUNT],
    pub(crate) mailbox: Mailbox,
    pub(crate) halted: bool,
    pub(crate) last_error: Status,
    pub(crate) hal: H,
}

impl<'p, H: Hal> Vm<'p, H> {
    /// Attach a program buffer and reset all VM state.
    ///
    /// A null/empty buffer is permitted for mailbox-only usage.
    pub fn init(program: &'p [u8], hal: H) -> Self {
        Self {
            program,
            pc: 0,
            registers: [0; REGISTER_COUNT],
            mailbox: Mailbox::new(),
            halted: false,
            last_error: Status::Ok,
            hal,
        }
    }

    /// The register file.
    pub const fn registers(&self) -> &[i32; REGISTER_COUNT] {
        &self.registers
    }

    /// Current program counter (byte offset into the program buffer).
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Length of the attached program buffer.
    pub const fn program_size(&self) -> usize {
        self.program.len()
    }

    /// `true` once `HALT` has executed. Terminal for this instance.
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Current state machine position.
    pub const fn state(&self) -> RunState {
        if self.halted {
            RunState::Halted
        } else {
            RunState::Running
        }
    }

    /// The last non-success condition raised during execution. Advisory:
    /// does not itself halt the VM on later steps.
    pub const fn last_error(&self) -> Status {
        self.last_error
    }

    /// Read-only view of the mailbox.
    pub const fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Validate and enqueue a command. Mutates the mailbox only.
    pub fn push(&mut self, command: Command) -> Result<(), Status> {
        self.mailbox.push(command)
    }

    /// Dequeue one command without executing `RECV_CMD`. Mutates the
    /// mailbox only.
    pub fn pop(&mut self) -> Result<Command, Status> {
        self.mailbox.pop()
    }

    /// Shared reference to the injected HAL, for hosts that want to inspect
    /// it between run slices.
    pub fn hal(&self) -> &H {
        &self.hal
    }
}
