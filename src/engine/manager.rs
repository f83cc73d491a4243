//! Registry of per-symbol books and the top-level entry point
//! (spec.md §4.2).

use crate::config::EngineSettings;
use crate::domain::{Order, OrderId, Trade};
use crate::engine::book::OrderBook;
use crate::error::EngineError;
use crate::ports::{LedgerPort, StoreContext};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// Registry of `OrderBook`s keyed by symbol, generic over the ledger
/// implementation an embedding application wires in.
///
/// The registry itself (`symbol -> book`) is the only thing protected
/// by a shared guard; once a book reference is obtained, operations on
/// different symbols proceed independently (spec.md §4.2, §5). A
/// `dashmap::DashMap` gives per-shard locking for that lookup without
/// introducing a single global mutex.
pub struct MatchingEngine<L: LedgerPort> {
    books: DashMap<String, Arc<OrderBook>>,
    ledger: L,
    settings: EngineSettings,
}

impl<L: LedgerPort> MatchingEngine<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_settings(ledger, EngineSettings::default())
    }

    pub fn with_settings(ledger: L, settings: EngineSettings) -> Self {
        Self {
            books: DashMap::new(),
            ledger,
            settings,
        }
    }

    /// Resolve or lazily create the book for `symbol`.
    pub fn book(&self, symbol: &str) -> Arc<OrderBook> {
        if let Some(existing) = self.books.get(symbol) {
            return existing.clone();
        }
        self.books
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(OrderBook::new(symbol, self.settings.clone())))
            .clone()
    }

    /// The top-level entry point for a new order (spec.md §4.2):
    /// resolves the symbol's book, then runs `add` + `match_all`
    /// atomically with respect to other submissions/cancels on the
    /// same symbol.
    pub fn submit_and_match<S: StoreContext>(
        &self,
        store: &mut S,
        order: &Order,
    ) -> Result<Vec<Trade>, EngineError> {
        let book = self.book(&order.symbol);
        book.submit_and_match(order, store, &self.ledger)
    }

    /// Mark the in-memory entry for `order_id` on `symbol` cancelled.
    /// Returns `false` if no book exists for `symbol` or the order is
    /// unknown to it. Does not touch the persistent store — the caller
    /// must flip the order to `CANCELLED` there first (spec.md §4.2,
    /// §6 cancel boundary).
    pub fn cancel(&self, symbol: &str, order_id: OrderId) -> bool {
        match self.books.get(symbol) {
            Some(book) => book.cancel(order_id),
            None => false,
        }
    }

    /// Number of books currently registered, for diagnostics and tests.
    pub fn book_count(&self) -> usize {
        self.books.len()
    }
}

impl<L: LedgerPort> std::fmt::Debug for MatchingEngine<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("symbols", &self.books.len())
            .finish()
    }
}

impl MatchingEngine<crate::ports::memory::InMemoryLedger> {
    /// Convenience constructor wiring the in-memory reference ledger,
    /// for tests and the demo walkthrough.
    pub fn in_memory() -> Self {
        info!("matching engine starting with in-memory ledger");
        Self::new(crate::ports::memory::InMemoryLedger::new())
    }
}
