//! `BookEntry` and the heap keys that give the two priority queues
//! their price/time ordering (spec.md §3, §4.1).

use crate::domain::{OrderId, Side};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// A resting order's residual state inside one [`crate::engine::OrderBook`].
///
/// `remaining = quantity - filled_quantity` as long as the book and
/// the store agree; a `cancelled` entry is a tombstone left in place
/// until it surfaces at the top of its queue (spec.md §3, glossary).
#[derive(Debug, Clone)]
pub(crate) struct BookEntry {
    #[allow(dead_code)]
    pub order_id: OrderId,
    #[allow(dead_code)]
    pub side: Side,
    pub price: Decimal,
    pub remaining: u64,
    #[allow(dead_code)]
    pub sequence: u64,
    pub cancelled: bool,
}

impl BookEntry {
    /// A live entry is the opposite of a tombstone or a drained order.
    pub fn is_live(&self) -> bool {
        !self.cancelled && self.remaining > 0
    }
}

/// Heap key for the bid side: ordered so a max-heap pops the highest
/// price first and, at equal price, the smaller (older) sequence
/// number first — price/time priority (spec.md §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BidKey {
    pub price: Decimal,
    pub sequence: u64,
    pub order_id: OrderId,
}

impl Ord for BidKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price
            .cmp(&other.price)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for BidKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Heap key for the ask side: ordered so a max-heap pops the lowest
/// price first and, at equal price, the smaller (older) sequence
/// number first (spec.md §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AskKey {
    pub price: Decimal,
    pub sequence: u64,
    pub order_id: OrderId,
}

impl Ord for AskKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .price
            .cmp(&self.price)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for AskKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
