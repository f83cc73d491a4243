//! Narrow ports to the engine's external collaborators (spec.md §6, §9).
//!
//! The persistent relational store and the append-only external ledger
//! are out of scope for this crate (spec.md §1) — the engine never
//! references them directly. Instead every call into the engine
//! carries a store context implementing [`OrderRepository`] and
//! [`TradeRepository`], and the engine is constructed with a shared
//! [`LedgerPort`]. This resolves the cyclic coupling the real system
//! has: the engine needs order rows to apply trades, but is logically
//! upstream of the store that owns them (spec.md §9).
//!
//! [`memory`] ships one concrete, in-memory implementation of both
//! traits for tests and the demo walkthrough. It is a reference/test
//! double, not a production store.

pub mod memory;

use crate::domain::{Order, OrderId, Trade, TradeId};
use std::error::Error as StdError;

/// Store-side read/write access to `Order` rows.
///
/// The engine calls `flush`/update operations but never commits — the
/// caller manages the surrounding transaction (spec.md §6).
pub trait OrderRepository {
    type Error: StdError + Send + Sync + 'static;

    /// Fetch an order by primary key.
    fn get_order(&mut self, id: OrderId) -> Result<Option<Order>, Self::Error>;

    /// Persist `filled_quantity` and `status` for an order already known
    /// to the store.
    fn update_order(&mut self, order: &Order) -> Result<(), Self::Error>;

    /// Orders with status in `{NEW, PARTIAL}`, ascending by creation
    /// timestamp then by id — used once, by [`crate::engine::Recovery`].
    fn list_open_orders_ordered_by_created_at(&mut self) -> Result<Vec<Order>, Self::Error>;
}

/// Store-side write access to `Trade` rows.
pub trait TradeRepository {
    type Error: StdError + Send + Sync + 'static;

    /// Insert a trade and make it visible (with its assigned id) before
    /// returning.
    fn insert_trade(&mut self, trade: Trade) -> Result<Trade, Self::Error>;
}

/// A store context is anything that can act as both repositories at
/// once — in production this is typically a single open transaction.
pub trait StoreContext: OrderRepository + TradeRepository {}

impl<T> StoreContext for T where T: OrderRepository + TradeRepository {}

/// The external append-only ledger (spec.md §4.4).
///
/// The call is best-effort: the engine catches any error and discards
/// it, leaving the trade's `ledger_reference` absent. Implementers
/// must make `record_trade` idempotent by `trade_id` — a crash between
/// a successful ledger call and the surrounding store commit replays
/// the order through [`crate::engine::Recovery`], and a naive retry
/// would otherwise double-record the trade on the ledger (spec.md §9).
pub trait LedgerPort: Send + Sync {
    /// Record a trade. `price_cents` is the trade price multiplied by
    /// 100 and rounded to the nearest integer, per spec.md §4.4.
    fn record_trade(
        &self,
        trade_id: TradeId,
        symbol: &str,
        price_cents: i64,
        quantity: u64,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
    ) -> Result<String, Box<dyn StdError + Send + Sync>>;
}
