use std::sync::Mutex;

use ferrobank_core::{AccountNo, LedgerError, LedgerResult};
use ferrobank_ledger::{Account, TransactionRecord};

use super::{LedgerState, LedgerStore, LedgerTxn};

/// In-memory ledger store.
///
/// A single mutex serializes all read-modify-write sections, which is the
/// fixed global acquisition order the transfer path relies on: a transaction
/// touching two accounts acquires one lock, once, so two transfers targeting
/// each other cannot deadlock. Writes accumulate in the transaction's
/// journal of touched entries; an `Err` from the closure discards the
/// journal, rolling back every provisional write.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<LedgerState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account, as the external account-opening flow would.
    pub fn open_account(&self, account: Account) -> LedgerResult<()> {
        self.with_transaction(|txn| txn.insert_account(account))
    }

    /// Committed balance snapshot for one account.
    pub fn account(&self, account_no: AccountNo) -> LedgerResult<Account> {
        self.with_transaction(|txn| txn.account(account_no).cloned())
    }

    /// Committed transaction history for one account, in commit order.
    pub fn transactions_for(&self, account_no: AccountNo) -> LedgerResult<Vec<TransactionRecord>> {
        self.with_transaction(|txn| Ok(txn.transactions_for(account_no)))
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn with_transaction<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerTxn<'_>) -> LedgerResult<T>,
    {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| LedgerError::store("lock poisoned"))?;

        let mut txn = LedgerTxn::new(&guard);
        let out = f(&mut txn)?;

        // Commit: fold the journal into the durable state. On the error path
        // above the journal is dropped and nothing changes.
        txn.into_journal().apply(&mut guard);
        Ok(out)
    }
}
