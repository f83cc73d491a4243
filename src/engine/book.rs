//! Per-symbol order book: two priority queues, an id index, a
//! sequence counter, and the single guard that serializes all three
//! (spec.md §3, §4.1).

use crate::config::EngineSettings;
use crate::domain::{Order, OrderId, Side, Trade};
use crate::engine::entry::{AskKey, BidKey, BookEntry};
use crate::error::EngineError;
use crate::ports::{LedgerPort, StoreContext};
use parking_lot::Mutex;
use std::collections::{BinaryHeap, HashMap};
use tracing::trace;

pub(crate) struct OrderBookState {
    pub(crate) bids: BinaryHeap<BidKey>,
    pub(crate) asks: BinaryHeap<AskKey>,
    pub(crate) entries: HashMap<OrderId, BookEntry>,
    pub(crate) next_sequence: u64,
}

impl OrderBookState {
    fn new() -> Self {
        Self {
            bids: BinaryHeap::new(),
            asks: BinaryHeap::new(),
            entries: HashMap::new(),
            next_sequence: 0,
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }
}

/// The order book for one symbol. Created lazily by
/// [`crate::engine::MatchingEngine`] on first submission and lives for
/// the process's lifetime (spec.md §3).
pub struct OrderBook {
    symbol: String,
    pub(crate) settings: EngineSettings,
    pub(crate) state: Mutex<OrderBookState>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>, settings: EngineSettings) -> Self {
        let symbol = symbol.into();
        tracing::info!(symbol = %symbol, "order book created");
        Self {
            symbol,
            settings,
            state: Mutex::new(OrderBookState::new()),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Insert a resting entry for `order`.
    ///
    /// Preconditions (spec.md §4.1): `order.price > 0` and
    /// `order.quantity > order.filled_quantity`. A non-positive
    /// residual quantity is a silent no-op, not an error — the order
    /// simply has nothing left to rest.
    ///
    /// Calling `add` twice with the same order id is undefined at this
    /// layer; [`crate::engine::MatchingEngine`] must prevent it.
    pub fn add(&self, order: &Order) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        self.add_locked(&mut state, order)
    }

    pub(crate) fn add_locked(
        &self,
        state: &mut OrderBookState,
        order: &Order,
    ) -> Result<(), EngineError> {
        if order.price <= rust_decimal::Decimal::ZERO {
            return Err(EngineError::InvalidOrder {
                order_id: order.id,
                reason: "price must be strictly positive".to_string(),
            });
        }
        if order.quantity <= order.filled_quantity {
            return Err(EngineError::InvalidOrder {
                order_id: order.id,
                reason: "quantity must exceed filled_quantity".to_string(),
            });
        }

        let remaining = order.remaining();
        if remaining == 0 {
            return Ok(());
        }

        let sequence = state.next_sequence();
        let entry = BookEntry {
            order_id: order.id,
            side: order.side,
            price: order.price,
            remaining,
            sequence,
            cancelled: false,
        };

        match order.side {
            Side::Buy => state.bids.push(BidKey {
                price: order.price,
                sequence,
                order_id: order.id,
            }),
            Side::Sell => state.asks.push(AskKey {
                price: order.price,
                sequence,
                order_id: order.id,
            }),
        }
        state.entries.insert(order.id, entry);

        if self.settings.trace_book_mutations {
            trace!(
                symbol = %self.symbol, order_id = %order.id, %sequence, remaining,
                "entry added to book"
            );
        }
        Ok(())
    }

    /// Mark a live entry cancelled. Returns `true` if the entry existed
    /// (live or already tombstoned), `false` if unknown to this book.
    /// Cancel never rebalances the heap — the tombstone is evicted
    /// lazily when it surfaces at the top (spec.md §4.1, glossary).
    pub fn cancel(&self, order_id: OrderId) -> bool {
        let mut state = self.state.lock();
        match state.entries.get_mut(&order_id) {
            Some(entry) => {
                entry.cancelled = true;
                if self.settings.trace_book_mutations {
                    trace!(symbol = %self.symbol, %order_id, "entry cancelled");
                }
                true
            }
            None => false,
        }
    }

    /// Run the matching loop to fixed point (spec.md §4.1).
    pub fn match_all<S, L>(&self, store: &mut S, ledger: &L) -> Result<Vec<Trade>, EngineError>
    where
        S: StoreContext,
        L: LedgerPort,
    {
        let mut state = self.state.lock();
        self.match_locked(&mut state, store, ledger)
    }

    /// `add` then `match_all` under a single lock acquisition, so no
    /// other submission or cancel on this symbol can interleave
    /// between them (spec.md §4.2).
    pub(crate) fn submit_and_match<S, L>(
        &self,
        order: &Order,
        store: &mut S,
        ledger: &L,
    ) -> Result<Vec<Trade>, EngineError>
    where
        S: StoreContext,
        L: LedgerPort,
    {
        let mut state = self.state.lock();
        self.add_locked(&mut state, order)?;
        self.match_locked(&mut state, store, ledger)
    }
}
