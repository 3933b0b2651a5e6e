//! JSON file store
//!
//! Budgets live in `data/budgets.json` and transactions in
//! `data/transactions.json`. Both files are loaded once on open. After a
//! mutation, the files whose content changed are replaced together: either
//! all of them are written or none is.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;
use crate::models::{Budget, BudgetId, BudgetSlice, SliceId, Transaction, TransactionId};

use super::file_io::{read_json, JsonBatch};
use super::memory::{LedgerData, MemoryStore};
use super::LedgerStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct BudgetFile {
    #[serde(default)]
    budgets: Vec<Budget>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TransactionFile {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Serialize)]
struct BudgetFileRef<'a> {
    budgets: &'a [Budget],
}

#[derive(Serialize)]
struct TransactionFileRef<'a> {
    transactions: &'a [Transaction],
}

/// Store backed by two JSON files under the data directory
#[derive(Debug)]
pub struct JsonStore {
    budgets_path: PathBuf,
    transactions_path: PathBuf,
    cache: MemoryStore,
}

impl JsonStore {
    /// Load both files; missing files start out empty
    pub fn open(paths: &LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        let budgets_path = paths.budgets_file();
        let transactions_path = paths.transactions_file();

        let budget_file: BudgetFile = read_json(&budgets_path)?;
        let transaction_file: TransactionFile = read_json(&transactions_path)?;
        debug!(
            budgets = budget_file.budgets.len(),
            transactions = transaction_file.transactions.len(),
            path = %budgets_path.display(),
            "loaded ledger files"
        );

        let data = LedgerData {
            budgets: budget_file.budgets,
            transactions: transaction_file.transactions,
        };

        let hook_budgets = budgets_path.clone();
        let hook_transactions = transactions_path.clone();
        let cache = MemoryStore::with_commit_hook(
            data,
            Box::new(move |before: &LedgerData, after: &LedgerData| {
                let mut batch = JsonBatch::new();
                if before.budgets != after.budgets {
                    batch.stage(&hook_budgets, &BudgetFileRef { budgets: &after.budgets })?;
                }
                if before.transactions != after.transactions {
                    batch.stage(
                        &hook_transactions,
                        &TransactionFileRef {
                            transactions: &after.transactions,
                        },
                    )?;
                }
                if batch.is_empty() {
                    return Ok(());
                }

                batch.commit()?;
                debug!(
                    budgets = after.budgets.len(),
                    transactions = after.transactions.len(),
                    "saved ledger files"
                );
                Ok(())
            }),
        );

        Ok(Self {
            budgets_path,
            transactions_path,
            cache,
        })
    }

    pub fn budgets_path(&self) -> &PathBuf {
        &self.budgets_path
    }

    pub fn transactions_path(&self) -> &PathBuf {
        &self.transactions_path
    }
}

impl LedgerStore for JsonStore {
    fn fetch_budgets(&self, year: i32) -> LedgerResult<Vec<Budget>> {
        self.cache.fetch_budgets(year)
    }

    fn fetch_transactions(&self, year: i32) -> LedgerResult<Vec<Transaction>> {
        self.cache.fetch_transactions(year)
    }

    fn fetch_budget(&self, budget_id: BudgetId) -> LedgerResult<Budget> {
        self.cache.fetch_budget(budget_id)
    }

    fn add_budget(&self, budget: &Budget) -> LedgerResult<()> {
        self.cache.add_budget(budget)
    }

    fn add_slice(&self, slice: &BudgetSlice, budget_id: BudgetId) -> LedgerResult<()> {
        self.cache.add_slice(slice, budget_id)
    }

    fn add_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        self.cache.add_transaction(transaction)
    }

    fn delete_budgets(&self, ids: &HashSet<BudgetId>) -> LedgerResult<HashSet<BudgetId>> {
        self.cache.delete_budgets(ids)
    }

    fn delete_slices(&self, ids: &HashSet<SliceId>, budget_id: BudgetId) -> LedgerResult<()> {
        self.cache.delete_slices(ids, budget_id)
    }

    fn delete_transactions(&self, ids: &HashSet<TransactionId>) -> LedgerResult<()> {
        self.cache.delete_transactions(ids)
    }

    fn update_budget(
        &self,
        name: &str,
        icon: Option<&str>,
        budget_id: BudgetId,
    ) -> LedgerResult<()> {
        self.cache.update_budget(name, icon, budget_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::models::{BudgetKind, MoneyValue, ScheduledAmount};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn paths(temp_dir: &TempDir) -> LedgerPaths {
        LedgerPaths::with_base_dir(temp_dir.path().to_path_buf())
    }

    #[test]
    fn test_open_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::open(&paths(&temp_dir)).unwrap();

        assert!(store.fetch_budgets(2024).unwrap().is_empty());
        assert!(!store.budgets_path().exists());
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let tax_slice = BudgetSlice::scheduled(
            "Property",
            vec![ScheduledAmount::new(MoneyValue::from(900), 4)],
        )
        .unwrap();
        let tax =
            Budget::new(2024, "Tax", "", BudgetKind::Expense, vec![tax_slice.clone()]).unwrap();
        let txn = Transaction::expense(
            Some("April bill".into()),
            NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            MoneyValue::from(900),
            tax.id,
            tax_slice.id,
        )
        .unwrap();

        {
            let store = JsonStore::open(&paths(&temp_dir)).unwrap();
            store.add_budget(&tax).unwrap();
            store.add_transaction(&txn).unwrap();
            store.update_budget("Taxes", None, tax.id).unwrap();
        }

        let store = JsonStore::open(&paths(&temp_dir)).unwrap();
        let budgets = store.fetch_budgets(2024).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].name, "Taxes");
        assert_eq!(budgets[0].availability_up_to(4), MoneyValue::from(900));
        assert_eq!(store.fetch_transactions(2024).unwrap(), vec![txn]);
    }

    #[test]
    fn test_rejected_change_leaves_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::open(&paths(&temp_dir)).unwrap();
        let food =
            Budget::with_monthly_amount(2024, "Food", "", BudgetKind::Expense, MoneyValue::from(5))
                .unwrap();
        store.add_budget(&food).unwrap();
        let before = std::fs::read_to_string(store.budgets_path()).unwrap();

        let only = HashSet::from([food.slices()[0].id]);
        assert!(matches!(
            store.delete_slices(&only, food.id),
            Err(LedgerError::NoSlices)
        ));
        assert_eq!(std::fs::read_to_string(store.budgets_path()).unwrap(), before);
    }

    #[test]
    fn test_corrupt_file_fails_to_open() {
        let temp_dir = TempDir::new().unwrap();
        let paths = paths(&temp_dir);
        paths.ensure_directories().unwrap();
        std::fs::write(paths.budgets_file(), "{ nope").unwrap();

        assert!(matches!(JsonStore::open(&paths), Err(LedgerError::Storage(_))));
    }

    fn block_with_directory(path: &std::path::Path) {
        if path.exists() {
            std::fs::remove_file(path).unwrap();
        }
        std::fs::create_dir_all(path.join("inside")).unwrap();
    }

    #[test]
    fn test_failed_write_leaves_both_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        let paths = paths(&temp_dir);
        let store = JsonStore::open(&paths).unwrap();

        let food =
            Budget::with_monthly_amount(2024, "Food", "", BudgetKind::Expense, MoneyValue::from(5))
                .unwrap();
        let lunch = Transaction::expense(
            None,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            MoneyValue::from(3),
            food.id,
            food.slices()[0].id,
        )
        .unwrap();
        store.add_budget(&food).unwrap();
        store.add_transaction(&lunch).unwrap();
        let before = std::fs::read_to_string(store.budgets_path()).unwrap();

        // Deleting the budget cascades, so both files must change
        block_with_directory(store.transactions_path());
        let result = store.delete_budgets(&HashSet::from([food.id]));

        assert!(matches!(result, Err(LedgerError::Storage(_))));
        assert_eq!(std::fs::read_to_string(store.budgets_path()).unwrap(), before);
        assert_eq!(store.fetch_budgets(2024).unwrap(), vec![food]);
        assert_eq!(store.fetch_transactions(2024).unwrap(), vec![lunch]);
        assert!(!paths.budgets_file().with_extension("json.bak").exists());
        assert!(!paths.budgets_file().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_only_changed_file_is_written() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::open(&paths(&temp_dir)).unwrap();

        block_with_directory(store.transactions_path());
        let food =
            Budget::with_monthly_amount(2024, "Food", "", BudgetKind::Expense, MoneyValue::from(5))
                .unwrap();
        store.add_budget(&food).unwrap();

        let saved = std::fs::read_to_string(store.budgets_path()).unwrap();
        assert!(saved.contains("Food"));
        assert!(store.transactions_path().is_dir());
    }
}
