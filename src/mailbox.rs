//! Bounded single-producer/single-consumer command queue.
//!
//! The mailbox is designed for a host producer interleaved with the VM's
//! `RECV_CMD` consumer. The head/tail/count triple is not atomic: a host
//! using a multi-threaded producer must serialize calls to [`Mailbox::push`]
//! and must not call it concurrently with [`crate::Vm::step`] or
//! [`crate::Vm::run`].

use crate::command::{validate_command, Command};
use crate::consts::MAILBOX_CAPACITY;
use crate::error::Status;

/// Fixed-capacity circular queue of [`Command`]s.
#[derive(Debug, Clone)]
pub struct Mailbox {
    items: [Command; MAILBOX_CAPACITY],
    head: usize,
    tail: usize,
    count: usize,
}

impl Default for Mailbox {
    fn default() -> Self {
        Self {
            items: [Command::NONE; MAILBOX_CAPACITY],
            head: 0,
            tail: 0,
            count: 0,
        }
    }
}

impl Mailbox {
    /// An empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands currently queued.
    pub const fn len(&self) -> usize {
        self.count
    }

    /// `true` if no commands are queued.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `true` if the mailbox is at capacity.
    pub const fn is_full(&self) -> bool {
        self.count == MAILBOX_CAPACITY
    }

    /// Validate and enqueue a command.
    ///
    /// On any validation failure the mailbox is left byte-identical to its
    /// pre-call state.
    pub fn push(&mut self, command: Command) -> Result<(), Status> {
        validate_command(&command)?;
        if self.is_full() {
            tracing::debug!(count = self.count, "mailbox full, rejecting push");
            return Err(Status::MailboxFull);
        }
        self.items[self.tail] = command;
        self.tail = (self.tail + 1) % MAILBOX_CAPACITY;
        self.count += 1;
        tracing::trace!(r#type = command.r#type, count = self.count, "mailbox push");
        Ok(())
    }

    /// Dequeue the oldest command, if any.
    pub fn pop(&mut self) -> Result<Command, Status> {
        if self.is_empty() {
            return Err(Status::MailboxEmpty);
        }
        let command = self.items[self.head];
        self.head = (self.head + 1) % MAILBOX_CAPACITY;
        self.count -= 1;
        tracing::trace!(r#type = command.r#type, count = self.count, "mailbox pop");
        Ok(command)
    }
}
