//! Budget Ledger - yearly budgeting from the command line
//!
//! This library keeps a year's budgets and the transactions booked against
//! them, and derives from both how every budget and month stands.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Money, budgets, slices and transactions
//! - `validators`: Rules checked before a change is stored
//! - `overview`: The yearly overview and everything computed from it
//! - `storage`: The store trait with in-memory and JSON file backends
//! - `services`: Store-then-apply operations on an overview
//! - `cli`: Command handlers
//! - `display`: Terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_ledger::config::{LedgerPaths, Settings};
//! use budget_ledger::services::OverviewService;
//! use budget_ledger::storage::JsonStore;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = JsonStore::open(&paths)?;
//! let overview =
//!     OverviewService::new(&store).load("Personal", 2024, settings.opening_balance(2024))?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod overview;
pub mod services;
pub mod storage;
pub mod validators;

pub use error::{LedgerError, LedgerResult};

use std::sync::Once;

/// Environment variable holding a tracing filter, e.g. `budget_ledger=debug`
pub const LOG_ENV: &str = "BUDGET_LEDGER_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr
///
/// The filter comes from `BUDGET_LEDGER_LOG` when set, else `default_level`.
/// Calling this more than once has no effect.
pub fn init_tracing(default_level: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        // A subscriber installed elsewhere (e.g. by a test harness) wins.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
