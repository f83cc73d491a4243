//! Reference in-memory implementations of the store and ledger ports.
//!
//! These exist to exercise the engine in tests, property checks, and
//! the `demos/scenario_walkthrough` binary. They are not a production
//! store: a real deployment plugs in its own `sqlx`/`diesel`-backed
//! repository and its own ledger adapter (spec.md §1 non-goals).

use crate::domain::{Order, OrderId, OrderStatus, Trade, TradeId};
use crate::ports::{LedgerPort, OrderRepository, TradeRepository};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

/// Shared, thread-safe in-memory order/trade store.
///
/// `InMemoryStore` is cheaply cloneable: every clone shares the same
/// underlying tables, mimicking how a real connection pool hands out
/// many handles onto one database.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    orders: HashMap<OrderId, Order>,
    trades: Vec<Trade>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an order row, as upstream code does before
    /// calling `submit_and_match` (spec.md §6 submission boundary).
    pub fn put_order(&self, order: Order) {
        self.inner.lock().orders.insert(order.id, order);
    }

    /// Flip an order to `CANCELLED`, as upstream code does before
    /// calling `MatchingEngine::cancel` (spec.md §6 cancel boundary).
    /// Returns `false` if the order is unknown or already terminal.
    pub fn cancel_order(&self, id: OrderId) -> bool {
        let mut tables = self.inner.lock();
        match tables.orders.get_mut(&id) {
            Some(order) if !order.status.is_terminal() => {
                order.status = OrderStatus::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// Snapshot of an order by id, for assertions in tests.
    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.inner.lock().orders.get(&id).cloned()
    }

    /// All trades inserted so far, in insertion order.
    pub fn trades(&self) -> Vec<Trade> {
        self.inner.lock().trades.clone()
    }
}

impl OrderRepository for InMemoryStore {
    type Error = Infallible;

    fn get_order(&mut self, id: OrderId) -> Result<Option<Order>, Self::Error> {
        Ok(self.inner.lock().orders.get(&id).cloned())
    }

    fn update_order(&mut self, order: &Order) -> Result<(), Self::Error> {
        self.inner.lock().orders.insert(order.id, order.clone());
        Ok(())
    }

    fn list_open_orders_ordered_by_created_at(&mut self) -> Result<Vec<Order>, Self::Error> {
        let tables = self.inner.lock();
        let mut open: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| matches!(o.status, OrderStatus::New | OrderStatus::Partial))
            .cloned()
            .collect();
        open.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(open)
    }
}

impl TradeRepository for InMemoryStore {
    type Error = Infallible;

    fn insert_trade(&mut self, mut trade: Trade) -> Result<Trade, Self::Error> {
        trade.id = Uuid::new_v4();
        let mut tables = self.inner.lock();
        tables.trades.push(trade.clone());
        Ok(trade)
    }
}

/// In-memory ledger that always succeeds, returning a synthetic
/// reference derived from the trade id.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    recorded: Arc<Mutex<Vec<TradeId>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded_count(&self) -> usize {
        self.recorded.lock().len()
    }
}

impl LedgerPort for InMemoryLedger {
    fn record_trade(
        &self,
        trade_id: TradeId,
        _symbol: &str,
        _price_cents: i64,
        _quantity: u64,
        _buy_order_id: OrderId,
        _sell_order_id: OrderId,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.recorded.lock().push(trade_id);
        Ok(format!("ledger-ref-{trade_id}"))
    }
}

/// A ledger double that always fails, for exercising the
/// `LedgerFailure` self-healing path.
#[derive(Clone, Default)]
pub struct FailingLedger;

impl LedgerPort for FailingLedger {
    fn record_trade(
        &self,
        _trade_id: TradeId,
        _symbol: &str,
        _price_cents: i64,
        _quantity: u64,
        _buy_order_id: OrderId,
        _sell_order_id: OrderId,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Err("ledger unreachable".into())
    }
}
