//! Request fencing

use std::cell::Cell;

/// Sequence number issued for one load of one container
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Monotonic ticket counter for a single container.
///
/// Only the most recently issued ticket is current; a response carrying any
/// older ticket must not be rendered.
#[derive(Debug, Default)]
pub struct RequestFence {
    latest: Cell<u64>,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        Ticket(next)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest.get()
    }
}
