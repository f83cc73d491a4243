use crate::config::EngineSettings;
use crate::domain::{Order, OrderStatus, OrderType, Side};
use crate::engine::OrderBook;
use crate::error::EngineError;
use crate::ports::memory::{FailingLedger, InMemoryLedger, InMemoryStore};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

fn order(side: Side, price: i64, quantity: u64) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        symbol: "AAPL".to_string(),
        side,
        order_type: OrderType::Limit,
        price: Decimal::from(price),
        quantity,
        filled_quantity: 0,
        status: OrderStatus::New,
        created_at: Utc::now(),
    }
}

#[test]
fn add_rejects_non_positive_price() {
    let book = OrderBook::new("AAPL", EngineSettings::default());
    let mut bad = order(Side::Buy, 1, 1);
    bad.price = Decimal::ZERO;
    let err = book.add(&bad).unwrap_err();
    assert!(matches!(err, EngineError::InvalidOrder { .. }));
}

#[test]
fn add_rejects_fully_filled_order() {
    let book = OrderBook::new("AAPL", EngineSettings::default());
    let mut bad = order(Side::Buy, 100, 5);
    bad.filled_quantity = 5;
    let err = book.add(&bad).unwrap_err();
    assert!(matches!(err, EngineError::InvalidOrder { .. }));
}

#[test]
fn match_all_is_noop_on_empty_book() {
    let book = OrderBook::new("AAPL", EngineSettings::default());
    let mut store = InMemoryStore::new();
    let ledger = InMemoryLedger::new();
    let trades = book.match_all(&mut store, &ledger).unwrap();
    assert!(trades.is_empty());
}

#[test]
fn cancel_unknown_order_returns_false() {
    let book = OrderBook::new("AAPL", EngineSettings::default());
    assert!(!book.cancel(Uuid::new_v4()));
}

#[test]
fn cancel_known_order_returns_true_and_prevents_match() {
    let book = OrderBook::new("AAPL", EngineSettings::default());
    let mut store = InMemoryStore::new();
    let ledger = InMemoryLedger::new();

    let sell = order(Side::Sell, 100, 5);
    store.put_order(sell.clone());
    book.add(&sell).unwrap();
    assert!(book.cancel(sell.id));

    let buy = order(Side::Buy, 120, 3);
    store.put_order(buy.clone());
    book.add(&buy).unwrap();
    let trades = book.match_all(&mut store, &ledger).unwrap();

    assert!(trades.is_empty());
}

#[test]
fn ledger_failure_is_swallowed_and_trade_still_persists() {
    let book = OrderBook::new("AAPL", EngineSettings::default());
    let mut store = InMemoryStore::new();
    let ledger = FailingLedger;

    let sell = order(Side::Sell, 100, 5);
    store.put_order(sell.clone());
    book.add(&sell).unwrap();

    let buy = order(Side::Buy, 120, 3);
    store.put_order(buy.clone());
    book.add(&buy).unwrap();

    let trades = book.match_all(&mut store, &ledger).unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 3);
    assert!(
        trades[0].ledger_reference.is_none(),
        "a failing ledger must not block the trade, but must leave no reference"
    );
}
