//! End-to-end scenarios S1-S6 (spec.md §8) against the public API and
//! the in-memory store/ledger.

use chrono::Utc;
use matching_core::domain::{Order, OrderStatus, OrderType, Side};
use matching_core::engine::{MatchingEngine, Recovery};
use matching_core::ports::memory::InMemoryStore;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Best-effort: several test binaries in this crate call this, so a
/// second or third call finding the subscriber already set is expected.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn order(symbol: &str, side: Side, price: i64, quantity: u64) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        symbol: symbol.to_string(),
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
fn s1_crossing_produces_partial_and_filled_at_ask_price() {
    init_tracing();
    let engine = MatchingEngine::in_memory();
    let mut store = InMemoryStore::new();

    let sell1 = order("AAPL", Side::Sell, 100, 5);
    store.put_order(sell1.clone());
    engine.submit_and_match(&mut store, &sell1).unwrap();

    let buy2 = order("AAPL", Side::Buy, 120, 3);
    store.put_order(buy2.clone());
    let trades = engine.submit_and_match(&mut store, &buy2).unwrap();

    assert_eq!(trades.len(), 1);
    let trade = &trades[0];
    assert_eq!(trade.symbol, "AAPL");
    assert_eq!(trade.quantity, 3);
    assert_eq!(trade.price, Decimal::from(100));
    assert_eq!(trade.buy_order_id, buy2.id);
    assert_eq!(trade.sell_order_id, sell1.id);

    let sell1_after = store.order(sell1.id).unwrap();
    assert_eq!(sell1_after.status, OrderStatus::Partial);
    assert_eq!(sell1_after.filled_quantity, 3);

    let buy2_after = store.order(buy2.id).unwrap();
    assert_eq!(buy2_after.status, OrderStatus::Filled);
    assert_eq!(buy2_after.filled_quantity, 3);
}

#[test]
fn s2_no_cross_no_trade() {
    init_tracing();
    let engine = MatchingEngine::in_memory();
    let mut store = InMemoryStore::new();

    let sell1 = order("AAPL", Side::Sell, 150, 5);
    store.put_order(sell1.clone());
    engine.submit_and_match(&mut store, &sell1).unwrap();

    let buy2 = order("AAPL", Side::Buy, 120, 3);
    store.put_order(buy2.clone());
    let trades = engine.submit_and_match(&mut store, &buy2).unwrap();

    assert!(trades.is_empty());
    assert_eq!(store.order(sell1.id).unwrap().status, OrderStatus::New);
    assert_eq!(store.order(sell1.id).unwrap().filled_quantity, 0);
    assert_eq!(store.order(buy2.id).unwrap().status, OrderStatus::New);
    assert_eq!(store.order(buy2.id).unwrap().filled_quantity, 0);
}

#[test]
fn s3_cancel_before_cross() {
    init_tracing();
    let engine = MatchingEngine::in_memory();
    let mut store = InMemoryStore::new();

    let sell1 = order("AAPL", Side::Sell, 100, 5);
    store.put_order(sell1.clone());
    engine.submit_and_match(&mut store, &sell1).unwrap();

    let mut cancelled = store.order(sell1.id).unwrap();
    cancelled.status = OrderStatus::Cancelled;
    store.put_order(cancelled);
    engine.cancel("AAPL", sell1.id);

    let buy2 = order("AAPL", Side::Buy, 120, 3);
    store.put_order(buy2.clone());
    let trades = engine.submit_and_match(&mut store, &buy2).unwrap();

    assert!(trades.is_empty());
    assert_eq!(store.order(buy2.id).unwrap().status, OrderStatus::New);
}

#[test]
fn s4_time_priority_at_equal_price() {
    init_tracing();
    let engine = MatchingEngine::in_memory();
    let mut store = InMemoryStore::new();

    let sell1 = order("AAPL", Side::Sell, 100, 4);
    store.put_order(sell1.clone());
    engine.submit_and_match(&mut store, &sell1).unwrap();

    let sell2 = order("AAPL", Side::Sell, 100, 4);
    store.put_order(sell2.clone());
    engine.submit_and_match(&mut store, &sell2).unwrap();

    let buy3 = order("AAPL", Side::Buy, 100, 6);
    store.put_order(buy3.clone());
    let trades = engine.submit_and_match(&mut store, &buy3).unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].sell_order_id, sell1.id);
    assert_eq!(trades[0].quantity, 4);
    assert_eq!(trades[1].sell_order_id, sell2.id);
    assert_eq!(trades[1].quantity, 2);

    assert_eq!(store.order(buy3.id).unwrap().status, OrderStatus::Filled);
    assert_eq!(store.order(buy3.id).unwrap().filled_quantity, 6);
    assert_eq!(store.order(sell1.id).unwrap().status, OrderStatus::Filled);
    assert_eq!(store.order(sell1.id).unwrap().filled_quantity, 4);
    assert_eq!(store.order(sell2.id).unwrap().status, OrderStatus::Partial);
    assert_eq!(store.order(sell2.id).unwrap().filled_quantity, 2);
}

#[test]
fn s5_walk_the_book_across_multiple_prices() {
    init_tracing();
    let engine = MatchingEngine::in_memory();
    let mut store = InMemoryStore::new();

    let sell1 = order("AAPL", Side::Sell, 100, 2);
    store.put_order(sell1.clone());
    engine.submit_and_match(&mut store, &sell1).unwrap();

    let sell2 = order("AAPL", Side::Sell, 101, 3);
    store.put_order(sell2.clone());
    engine.submit_and_match(&mut store, &sell2).unwrap();

    let buy3 = order("AAPL", Side::Buy, 101, 4);
    store.put_order(buy3.clone());
    let trades = engine.submit_and_match(&mut store, &buy3).unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].quantity, 2);
    assert_eq!(trades[0].price, Decimal::from(100));
    assert_eq!(trades[1].quantity, 2);
    assert_eq!(trades[1].price, Decimal::from(101));

    assert_eq!(store.order(sell1.id).unwrap().status, OrderStatus::Filled);
    assert_eq!(store.order(sell2.id).unwrap().status, OrderStatus::Partial);
    assert_eq!(store.order(sell2.id).unwrap().filled_quantity, 2);
    assert_eq!(store.order(buy3.id).unwrap().status, OrderStatus::Filled);
}

#[test]
fn s6_recovery_reconstructs_priorities() {
    init_tracing();
    let engine = MatchingEngine::in_memory();
    let mut store = InMemoryStore::new();

    let mut sell1 = order("MSFT", Side::Sell, 100, 5);
    sell1.filled_quantity = 2;
    sell1.status = OrderStatus::Partial;
    store.put_order(sell1.clone());

    let sell2 = order("MSFT", Side::Sell, 100, 4);
    store.put_order(sell2.clone());

    Recovery::rebuild_from_store(&engine, &mut store).unwrap();

    let buy3 = order("MSFT", Side::Buy, 100, 6);
    store.put_order(buy3.clone());
    let trades = engine.submit_and_match(&mut store, &buy3).unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].sell_order_id, sell1.id);
    assert_eq!(trades[0].quantity, 3);
    assert_eq!(trades[1].sell_order_id, sell2.id);
    assert_eq!(trades[1].quantity, 3);
}
