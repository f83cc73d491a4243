//! Shared value types: orders, trades, sides, and statuses.
//!
//! These types are owned by the persistent store in production (see
//! [`crate::ports`]); the engine only ever borrows them through a
//! [`crate::ports::OrderRepository`] / [`crate::ports::TradeRepository`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary key of an [`Order`], minted by the store.
pub type OrderId = Uuid;

/// Primary key of a [`Trade`], minted by the store.
pub type TradeId = Uuid;

/// Primary key of the user owning an order.
pub type UserId = Uuid;

/// Resting side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side that would cross against this one.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type. `Limit` is the only variant in scope; market, stop, and
/// iceberg orders are explicit non-goals of the engine (spec.md §1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
}

/// Lifecycle status of an [`Order`].
///
/// `Filled`, `Cancelled`, and `Rejected` are absorbing: once reached,
/// an order never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Partial,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    /// `true` once an order can never fill or be cancelled again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

/// A limit order, as persisted by the store.
///
/// Invariants (spec.md §3): `0 <= filled_quantity <= quantity`, and
/// `status` is fully determined by `filled_quantity` relative to
/// `quantity` except at the absorbing statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Decimal,
    pub quantity: u64,
    pub filled_quantity: u64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Quantity not yet matched. Zero once `status` is `Filled`.
    pub fn remaining(&self) -> u64 {
        self.quantity.saturating_sub(self.filled_quantity)
    }

    /// Apply a fill of `qty`, updating `filled_quantity` and deriving
    /// the new status. Does not touch `status` if the order is already
    /// terminal — callers must not fill a terminal order.
    pub fn apply_fill(&mut self, qty: u64) {
        self.filled_quantity += qty;
        self.status = if self.filled_quantity >= self.quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
    }
}

/// An executed trade, immutable once inserted (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub symbol: String,
    pub price: Decimal,
    pub quantity: u64,
    pub executed_at: DateTime<Utc>,
    /// Opaque reference returned by the external ledger, or `None` when
    /// the best-effort ledger call failed (spec.md §4.4).
    pub ledger_reference: Option<String>,
}
