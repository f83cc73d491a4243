//! Reconstructing every book from the persisted open-order set at
//! process start (spec.md §4.3).

use crate::engine::manager::MatchingEngine;
use crate::error::EngineError;
use crate::ports::{LedgerPort, OrderRepository};
use tracing::info;

/// Rebuilds a [`MatchingEngine`]'s books from the store. Must run once,
/// before any submission is accepted.
///
/// Orders are scanned in `{NEW, PARTIAL}` status, ascending by creation
/// timestamp then id, and `add`ed in that order with no matching
/// triggered — the store already reflects every trade that happened
/// before shutdown, so replaying residuals in arrival order reproduces
/// the same priority ordering the engine had (spec.md §4.3).
pub struct Recovery;

impl Recovery {
    pub fn rebuild_from_store<S, L>(
        engine: &MatchingEngine<L>,
        store: &mut S,
    ) -> Result<usize, EngineError>
    where
        S: OrderRepository,
        L: LedgerPort,
    {
        let open_orders = store.list_open_orders_ordered_by_created_at().map_err(|e| {
            EngineError::StoreFailure {
                symbol: "*".to_string(),
                source: Box::new(e),
            }
        })?;

        let count = open_orders.len();
        for order in &open_orders {
            let book = engine.book(&order.symbol);
            book.add(order)?;
        }
        info!(orders_recovered = count, "recovery complete");
        Ok(count)
    }
}
