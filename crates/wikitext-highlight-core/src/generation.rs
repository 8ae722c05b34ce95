//! Generation counter for highlight passes.
//!
//! A pass may suspend while the parser is being acquired. When it resumes,
//! it only applies its result if no newer pass has started and the host has
//! not been detached in the meantime.

use std::cell::Cell;

/// Ticket held by one in-flight pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PassTicket(u64);

impl PassTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Per-host pass counter. Single-threaded (`Cell`), like the host itself.
#[derive(Debug, Default)]
pub struct PassGeneration {
    current: Cell<u64>,
    started: Cell<u64>,
}

impl PassGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new pass; every earlier ticket becomes stale.
    pub fn begin(&self) -> PassTicket {
        let next = self.current.get() + 1;
        self.current.set(next);
        self.started.set(self.started.get() + 1);
        PassTicket(next)
    }

    /// Make every outstanding ticket stale without starting a pass.
    pub fn invalidate(&self) {
        self.current.set(self.current.get() + 1);
    }

    pub fn is_current(&self, ticket: PassTicket) -> bool {
        self.current.get() == ticket.0
    }

    /// Number of passes started so far.
    pub fn started(&self) -> u64 {
        self.started.get()
    }
}
