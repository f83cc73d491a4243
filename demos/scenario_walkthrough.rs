//! Drives the end-to-end scenarios from spec.md §8 (S1–S6) against the
//! in-memory store, printing the resulting trades and order states.
//!
//! Not under `examples/` — that directory is reserved for the
//! retrieved reference pack this crate was built from.

use chrono::Utc;
use matching_core::domain::{Order, OrderStatus, OrderType, Side};
use matching_core::engine::{MatchingEngine, Recovery};
use matching_core::ports::memory::InMemoryStore;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

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

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("--- S1: crossing produces partial + filled, price = ask ---");
    let engine = MatchingEngine::in_memory();
    let mut store = InMemoryStore::new();

    let sell1 = order("AAPL", Side::Sell, 100, 5);
    store.put_order(sell1.clone());
    engine.submit_and_match(&mut store, &sell1).unwrap();

    let buy2 = order("AAPL", Side::Buy, 120, 3);
    store.put_order(buy2.clone());
    let trades = engine.submit_and_match(&mut store, &buy2).unwrap();

    for t in &trades {
        println!(
            "trade: {} qty={} price={} buy={} sell={}",
            t.symbol, t.quantity, t.price, t.buy_order_id, t.sell_order_id
        );
    }
    println!(
        "order 1: status={:?} filled={}",
        store.order(sell1.id).unwrap().status,
        store.order(sell1.id).unwrap().filled_quantity
    );
    println!(
        "order 2: status={:?} filled={}",
        store.order(buy2.id).unwrap().status,
        store.order(buy2.id).unwrap().filled_quantity
    );

    println!("\n--- S6: recovery reconstructs priorities ---");
    let engine2 = MatchingEngine::in_memory();
    let mut store2 = InMemoryStore::new();

    let mut resting1 = order("MSFT", Side::Sell, 100, 5);
    resting1.filled_quantity = 2;
    resting1.status = OrderStatus::Partial;
    store2.put_order(resting1.clone());

    let resting2 = order("MSFT", Side::Sell, 100, 4);
    store2.put_order(resting2.clone());

    Recovery::rebuild_from_store(&engine2, &mut store2).unwrap();

    let incoming = order("MSFT", Side::Buy, 100, 6);
    store2.put_order(incoming.clone());
    let trades = engine2.submit_and_match(&mut store2, &incoming).unwrap();
    for t in &trades {
        println!(
            "trade: {} qty={} price={} sell={}",
            t.symbol, t.quantity, t.price, t.sell_order_id
        );
    }
}
