//! Ambient configuration for an embedding application (SPEC_FULL §10.3).
//!
//! None of spec.md's matching rules are configurable — price/time
//! priority and ask-price execution are invariants, not knobs. What's
//! here is the handful of operational settings a deployment wants
//! without touching code, read with the same `config` crate the rest
//! of the pack's trading backend uses for its own settings.

use serde::Deserialize;

/// Tunables read once at `MatchingEngine` construction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Emit a `trace`-level log line for every entry added to or
    /// evicted from a book. Off by default — even at moderate order
    /// rates this is too noisy for production logging.
    pub trace_book_mutations: bool,
}

impl EngineSettings {
    /// Load settings from environment variables prefixed `ENGINE_`
    /// (e.g. `ENGINE_TRACE_BOOK_MUTATIONS=true`), falling back to
    /// defaults for anything unset. Never fails: an engine with no
    /// configuration present just runs with defaults, which is what
    /// every test in this crate relies on.
    pub fn from_env() -> Self {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ENGINE")
                    .try_parsing(true)
                    .separator("_"),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap_or_default()
    }
}
