//! The matching loop itself (spec.md §4.1).
//!
//! Inconsistencies between the book and the store (missing order,
//! cancelled order) are self-healed: the offending in-memory entry is
//! tombstoned and the loop retries. Ledger failures are swallowed.
//! Store failures propagate and abort the batch (spec.md §7).

use crate::domain::{Order, OrderId, Side, Trade};
use crate::engine::book::{OrderBook, OrderBookState};
use crate::engine::entry::{AskKey, BidKey};
use crate::error::{EngineError, SelfHealed};
use crate::ports::{LedgerPort, StoreContext};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BinaryHeap, HashMap};
use tracing::warn;
use uuid::Uuid;

impl OrderBook {
    pub(crate) fn match_locked<S, L>(
        &self,
        state: &mut OrderBookState,
        store: &mut S,
        ledger: &L,
    ) -> Result<Vec<Trade>, EngineError>
    where
        S: StoreContext,
        L: LedgerPort,
    {
        let mut produced = Vec::new();

        while let Some(bid_id) = top_valid_bid(&mut state.bids, &state.entries) {
            let Some(ask_id) = top_valid_ask(&mut state.asks, &state.entries) else {
                break;
            };

            let bid_price = state.entries[&bid_id].price;
            let ask_price = state.entries[&ask_id].price;
            if bid_price < ask_price {
                break;
            }

            let qty = state.entries[&bid_id]
                .remaining
                .min(state.entries[&ask_id].remaining);
            let trade_price = ask_price;

            let buy_order = store
                .get_order(bid_id)
                .map_err(|e| self.store_failure(e))?;
            let sell_order = store
                .get_order(ask_id)
                .map_err(|e| self.store_failure(e))?;

            let (mut buy_order, mut sell_order) = match (buy_order, sell_order) {
                (Some(b), Some(s)) => (b, s),
                _ => {
                    self.heal_missing(state, bid_id, ask_id);
                    continue;
                }
            };

            if self.tombstone_if_cancelled(state, &buy_order, &sell_order) {
                continue;
            }

            let trade = Trade {
                id: Uuid::new_v4(),
                buy_order_id: bid_id,
                sell_order_id: ask_id,
                symbol: self.symbol().to_string(),
                price: trade_price,
                quantity: qty,
                executed_at: Utc::now(),
                ledger_reference: None,
            };
            let mut trade = store
                .insert_trade(trade)
                .map_err(|e| self.store_failure(e))?;

            trade.ledger_reference = self
                .record_with_ledger(ledger, &trade)
                .inspect_err(|err| {
                    let healed = SelfHealed::LedgerFailure {
                        symbol: self.symbol().to_string(),
                        order_id: trade.buy_order_id,
                        source: format!("{err}").into(),
                    };
                    warn!("{healed}");
                })
                .ok();

            buy_order.apply_fill(qty);
            sell_order.apply_fill(qty);
            store
                .update_order(&buy_order)
                .map_err(|e| self.store_failure(e))?;
            store
                .update_order(&sell_order)
                .map_err(|e| self.store_failure(e))?;

            tracing::info!(
                symbol = %self.symbol(), buy_order_id = %bid_id, sell_order_id = %ask_id,
                price = %trade_price, quantity = qty, "trade executed"
            );

            {
                let bid_entry = state.entries.get_mut(&bid_id).expect("bid entry present");
                bid_entry.remaining -= qty;
            }
            {
                let ask_entry = state.entries.get_mut(&ask_id).expect("ask entry present");
                ask_entry.remaining -= qty;
            }
            if state.entries[&bid_id].remaining == 0 {
                state.bids.pop();
            }
            if state.entries[&ask_id].remaining == 0 {
                state.asks.pop();
            }

            produced.push(trade);
        }

        Ok(produced)
    }

    fn store_failure<E: std::error::Error + Send + Sync + 'static>(&self, source: E) -> EngineError {
        EngineError::StoreFailure {
            symbol: self.symbol().to_string(),
            source: Box::new(source),
        }
    }

    /// Either order row vanished from the store between book insertion
    /// and matching. Self-heal by draining both candidate entries so
    /// the loop retries against fresh top-of-book state.
    fn heal_missing(&self, state: &mut OrderBookState, bid_id: OrderId, ask_id: OrderId) {
        for (id, side) in [(bid_id, Side::Buy), (ask_id, Side::Sell)] {
            if let Some(entry) = state.entries.get_mut(&id) {
                entry.remaining = 0;
            }
            let healed = SelfHealed::InconsistentState {
                symbol: self.symbol().to_string(),
                order_id: id,
                side,
                reason: "order missing from store".to_string(),
            };
            warn!("{healed}");
        }
    }

    /// Tombstones whichever side the store reports as `CANCELLED`.
    /// Returns `true` if either side was tombstoned, meaning the loop
    /// should retry rather than trade.
    fn tombstone_if_cancelled(
        &self,
        state: &mut OrderBookState,
        buy_order: &Order,
        sell_order: &Order,
    ) -> bool {
        let mut healed = false;
        if buy_order.status == crate::domain::OrderStatus::Cancelled {
            if let Some(entry) = state.entries.get_mut(&buy_order.id) {
                entry.cancelled = true;
            }
            let healed_state = SelfHealed::InconsistentState {
                symbol: self.symbol().to_string(),
                order_id: buy_order.id,
                side: Side::Buy,
                reason: "order cancelled in store".to_string(),
            };
            warn!("{healed_state}");
            healed = true;
        }
        if sell_order.status == crate::domain::OrderStatus::Cancelled {
            if let Some(entry) = state.entries.get_mut(&sell_order.id) {
                entry.cancelled = true;
            }
            let healed_state = SelfHealed::InconsistentState {
                symbol: self.symbol().to_string(),
                order_id: sell_order.id,
                side: Side::Sell,
                reason: "order cancelled in store".to_string(),
            };
            warn!("{healed_state}");
            healed = true;
        }
        healed
    }

    /// Best-effort ledger call: whole-cent integer price (spec.md §4.4).
    fn record_with_ledger<L: LedgerPort>(
        &self,
        ledger: &L,
        trade: &Trade,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let price_cents = (trade.price * Decimal::from(100))
            .round()
            .to_i64()
            .unwrap_or(i64::MAX);
        ledger.record_trade(
            trade.id,
            &trade.symbol,
            price_cents,
            trade.quantity,
            trade.buy_order_id,
            trade.sell_order_id,
        )
    }
}

/// Peek the best live bid without popping it; pops and discards any
/// tombstoned or drained entry found above it.
fn top_valid_bid(
    bids: &mut BinaryHeap<BidKey>,
    entries: &HashMap<OrderId, crate::engine::entry::BookEntry>,
) -> Option<OrderId> {
    loop {
        let top = bids.peek()?;
        match entries.get(&top.order_id) {
            Some(entry) if entry.is_live() => return Some(top.order_id),
            _ => {
                bids.pop();
            }
        }
    }
}

/// Peek the best live ask without popping it; pops and discards any
/// tombstoned or drained entry found above it.
fn top_valid_ask(
    asks: &mut BinaryHeap<AskKey>,
    entries: &HashMap<OrderId, crate::engine::entry::BookEntry>,
) -> Option<OrderId> {
    loop {
        let top = asks.peek()?;
        match entries.get(&top.order_id) {
            Some(entry) if entry.is_live() => return Some(top.order_id),
            _ => {
                asks.pop();
            }
        }
    }
}
