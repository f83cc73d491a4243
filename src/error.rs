//! Error taxonomy for the matching engine (spec.md §7).
//!
//! `InvalidOrder` is synchronous and surfaces to the caller as a
//! 4xx-class failure; the engine never logs it. `StoreFailure`
//! propagates to the caller unchanged, which is expected to roll back
//! the surrounding transaction. `LedgerFailure` and `InconsistentState`
//! are never returned from a public operation — they exist so the
//! internals can construct a typed value to log at `warn` before
//! discarding it, per the propagation policy in spec.md §7.

use crate::domain::{OrderId, Side};
use std::error::Error as StdError;

/// Errors [`crate::engine::OrderBook::add`] raises when an order fails
/// its preconditions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `add` preconditions failed: non-positive price, or
    /// `quantity <= filled_quantity`.
    #[error("invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: OrderId, reason: String },

    /// The store port returned an error while the matching loop was
    /// reading an order or persisting a trade/update. Fatal to the
    /// in-flight batch; the caller must roll back.
    #[error("store failure while matching {symbol}")]
    StoreFailure {
        symbol: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Internal, non-propagating conditions logged at `warn` and then
/// discarded by [`crate::engine::OrderBook::match_all`].
#[derive(Debug, thiserror::Error)]
pub enum SelfHealed {
    /// The external ledger rejected or failed to record a trade.
    /// The trade still persists; its `ledger_reference` stays `None`.
    #[error("ledger failed to record trade for order {order_id} on {symbol}")]
    LedgerFailure {
        symbol: String,
        order_id: OrderId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The book's in-memory view of an order disagreed with the store
    /// (order missing, or already `Cancelled`). The in-memory entry is
    /// tombstoned and matching continues.
    #[error("book entry for order {order_id} ({side}) on {symbol} disagreed with the store: {reason}")]
    InconsistentState {
        symbol: String,
        order_id: OrderId,
        side: Side,
        reason: String,
    },
}
