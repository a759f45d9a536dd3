//! Priority-queue test element: a priority paired with an insertion id.

use kaido_core::{Bounded, Comparator};

/// Queue element whose ordering considers the priority only, leaving the
/// sequence id free to observe FIFO behaviour among equal priorities.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket {
    /// Priority compared by [`PriorityOrder`]; larger pops first.
    pub priority: i32,
    /// Insertion id; never compared.
    pub sequence: u64,
}

impl Ticket {
    /// Builds a ticket.
    #[must_use]
    pub const fn new(priority: i32, sequence: u64) -> Self {
        Self { priority, sequence }
    }
}

impl Bounded for Ticket {
    const MIN: Self = Self::new(i32::MIN, 0);
    const MAX: Self = Self::new(i32::MAX, 0);
}

/// Compares tickets by priority alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorityOrder;

impl Comparator<Ticket> for PriorityOrder {
    fn less(&self, a: &Ticket, b: &Ticket) -> bool {
        a.priority < b.priority
    }
}
