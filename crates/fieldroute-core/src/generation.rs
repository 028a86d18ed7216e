//! Generation tokens for last-write-wins assignment.
//!
//! Every new operation (file selection, request) takes a [`Ticket`] from the
//! owning [`GenerationCounter`]. When the operation resolves, its result may
//! only be assigned if the ticket is still the newest one issued; a slower,
//! older operation that resolves late is discarded.

/// Opaque token identifying one operation within a [`GenerationCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonically increasing source of [`Ticket`]s.
#[derive(Debug, Default, Clone)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every ticket issued before it.
    pub fn next(&mut self) -> Ticket {
        self.current = self.current.saturating_add(1);
        Ticket(self.current)
    }

    /// Returns `true` while `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }

    /// Invalidates all outstanding tickets without starting a new operation.
    pub fn invalidate(&mut self) {
        self.current = self.current.saturating_add(1);
    }
}
