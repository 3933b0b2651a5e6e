//! User settings for the budget ledger
//!
//! Stored as `config.json` in the base directory. Every field has a serde
//! default so older or hand-edited files keep loading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::MoneyValue;

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown in front of amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Character separating whole units from cents when parsing input
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Display name of the yearly overview
    #[serde(default = "default_overview_name")]
    pub overview_name: String,

    /// Balance carried into each year
    #[serde(default)]
    pub opening_balances: BTreeMap<i32, MoneyValue>,

    /// Default log filter when `BUDGET_LEDGER_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_decimal_separator() -> char {
    '.'
}

fn default_overview_name() -> String {
    "Personal".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            decimal_separator: default_decimal_separator(),
            overview_name: default_overview_name(),
            opening_balances: BTreeMap::new(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> LedgerResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> LedgerResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Opening balance configured for `year`, zero if none
    pub fn opening_balance(&self, year: i32) -> MoneyValue {
        self.opening_balances
            .get(&year)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_opening_balance(&mut self, year: i32, amount: MoneyValue) {
        self.opening_balances.insert(year, amount);
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: MoneyValue) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Parse user input with the configured decimal separator
    pub fn parse_money(&self, text: &str) -> LedgerResult<MoneyValue> {
        MoneyValue::try_parse(text, self.decimal_separator)
    }
}
