//! # Matching Core
//!
//! The in-memory matching engine at the heart of a trading platform:
//! per-symbol order books, price/time-priority matching, trade
//! emission, and recovery from a persistent store at startup.
//!
//! ## Scope
//!
//! Only single-symbol `LIMIT` orders with `BUY`/`SELL` side are in
//! scope. Market orders, iceberg/hidden orders, stop orders,
//! self-trade prevention, multi-leg orders, fee calculation,
//! margin/credit checks, and order-book depth snapshots are explicit
//! non-goals — see `SPEC_FULL.md` for the full rationale. Everything
//! outside the matching engine itself (HTTP, authentication,
//! notifications, the relational store, the external ledger) is an
//! external collaborator reached only through [`ports`].
//!
//! ## Layout
//!
//! - [`domain`] — shared value types (`Order`, `Trade`, `Side`, ids).
//! - [`engine`] — `OrderBook`, `MatchingEngine`, `Recovery`.
//! - [`ports`] — `OrderRepository`/`TradeRepository`/`LedgerPort`, plus
//!   an in-memory reference implementation used by tests and the demo.
//! - [`error`] — the engine's error taxonomy.
//! - [`config`] — ambient settings read from the environment.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
