//! Configuration for the budget ledger
//!
//! - Path resolution for settings and data files
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
