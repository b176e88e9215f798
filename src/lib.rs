//! A miniature register-based bytecode VM for resource-constrained
//! microcontrollers.
//!
//! The VM executes a compact instruction stream over a fixed 16-register
//! file, consumes externally produced commands from a bounded mailbox, and
//! effects all hardware side effects through a small set of built-in
//! functions (BIFs) routed through an injected [`Hal`] implementation. A
//! host drives the VM by pushing [`Command`]s into its mailbox and calling
//! [`Vm::step`]/[`Vm::run`] to advance execution.
//!
//! No dynamic memory allocation, no floating point, no preemption: the core
//! does a single fixed-size fetch-decode-execute step per call and never
//! grows the heap. The [`hal::StubHal`] test double is `std`-only and
//! gated behind the default `std` feature; a board back-end only needs to
//! implement [`Hal`] to link the core against real hardware.

pub mod command;
pub mod consts;
pub mod error;
pub mod hal;
pub mod interpreter;
pub mod mailbox;
pub mod vm;

pub mod prelude {
    //! Commonly used types, re-exported for convenient `use firmvm::prelude::*;`.
    pub use crate::command::{Command, CommandType};
    pub use crate::error::{Status, VmResult};
    pub use crate::hal::Hal;
    pub use crate::interpreter::{Bif, Opcode};
    pub use crate::mailbox::Mailbox;
    pub use crate::vm::{RunState, Vm};
}

pub use prelude::*;
