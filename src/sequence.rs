//! Ticket counters guarding the debounce timer and in-flight requests.

/// Monotonic ticket counter. Only the most recently issued ticket is current,
/// so a late timer or a slow response holding an older ticket is ignored.
#[derive(Debug, Default)]
pub struct Generation {
    latest: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, invalidating every earlier one.
    pub fn advance(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}
