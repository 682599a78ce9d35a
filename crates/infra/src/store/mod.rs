//! Ledger storage boundary.
//!
//! [`LedgerStore::with_transaction`] is the single atomic unit around every
//! balance mutation: the closure gets exclusive read-modify-write access to
//! accounts and transactions, and either every write it performs commits or
//! none do. Concurrent mutators on the same account serialize here, so a
//! balance read inside a transaction can never be stale by the time its
//! write lands (no lost updates).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;

use ferrobank_core::{AccountNo, LedgerError, LedgerResult, Money, TransactionId};
use ferrobank_ledger::{Account, TransactionKind, TransactionRecord};

pub mod in_memory;

pub use in_memory::InMemoryLedgerStore;

/// Runs closures as atomic read-modify-write transactions.
///
/// Any `Err` out of the closure rolls the whole unit back; persistence
/// failures surface as [`LedgerError::Store`] and commit nothing.
pub trait LedgerStore: Send + Sync {
    fn with_transaction<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerTxn<'_>) -> LedgerResult<T>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn with_transaction<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerTxn<'_>) -> LedgerResult<T>,
    {
        (**self).with_transaction(f)
    }
}

/// Persisted ledger state: the account table plus the append-only
/// transaction table, keyed by the store-assigned sequence.
#[derive(Debug, Default)]
pub struct LedgerState {
    accounts: HashMap<AccountNo, Account>,
    transactions: BTreeMap<TransactionId, TransactionRecord>,
    last_sequence: u64,
}

/// Handle to in-flight transaction state.
///
/// Writes go to a copy-on-write journal of only the touched entries, so a
/// transaction costs proportional to what it touches, not to the size of the
/// committed history. Reads see journal entries first, then the committed
/// base. Everything in the journal is provisional until the enclosing
/// [`LedgerStore::with_transaction`] call returns `Ok`.
pub struct LedgerTxn<'a> {
    base: &'a LedgerState,
    accounts: HashMap<AccountNo, Account>,
    transactions: BTreeMap<TransactionId, TransactionRecord>,
    last_sequence: u64,
}

/// The touched entries of a finished transaction, detached from the base
/// state so they can be applied to it.
pub(crate) struct TxnJournal {
    accounts: HashMap<AccountNo, Account>,
    transactions: BTreeMap<TransactionId, TransactionRecord>,
    last_sequence: u64,
}

impl TxnJournal {
    /// Fold the journal into the committed state.
    pub(crate) fn apply(self, state: &mut LedgerState) {
        state.accounts.extend(self.accounts);
        state.transactions.extend(self.transactions);
        state.last_sequence = self.last_sequence;
    }
}

impl<'a> LedgerTxn<'a> {
    pub(crate) fn new(base: &'a LedgerState) -> Self {
        Self {
            base,
            accounts: HashMap::new(),
            transactions: BTreeMap::new(),
            last_sequence: base.last_sequence,
        }
    }

    pub(crate) fn into_journal(self) -> TxnJournal {
        TxnJournal {
            accounts: self.accounts,
            transactions: self.transactions,
            last_sequence: self.last_sequence,
        }
    }

    /// Resolve an account by number.
    pub fn account(&self, account_no: AccountNo) -> LedgerResult<&Account> {
        self.accounts
            .get(&account_no)
            .or_else(|| self.base.accounts.get(&account_no))
            .ok_or(LedgerError::AccountNotFound(account_no))
    }

    /// Resolve an account for mutation, pulling it into the journal.
    pub fn account_mut(&mut self, account_no: AccountNo) -> LedgerResult<&mut Account> {
        if !self.accounts.contains_key(&account_no) {
            let committed = self
                .base
                .accounts
                .get(&account_no)
                .ok_or(LedgerError::AccountNotFound(account_no))?;
            self.accounts.insert(account_no, committed.clone());
        }
        self.accounts
            .get_mut(&account_no)
            .ok_or(LedgerError::AccountNotFound(account_no))
    }

    /// Insert a freshly opened account (the account-opening flow's seam).
    pub fn insert_account(&mut self, account: Account) -> LedgerResult<()> {
        let account_no = account.account_no();
        if self.accounts.contains_key(&account_no) || self.base.accounts.contains_key(&account_no) {
            return Err(LedgerError::validation(format!(
                "account {account_no} already exists"
            )));
        }
        self.accounts.insert(account_no, account);
        Ok(())
    }

    /// Append a transaction record documenting a just-applied mutation.
    ///
    /// Assigns the next sequence id and stamps the current time; the record
    /// commits together with the balance write it belongs to.
    pub fn record(
        &mut self,
        account_no: AccountNo,
        kind: TransactionKind,
        amount: Money,
        balance_after: Money,
    ) -> LedgerResult<TransactionRecord> {
        self.last_sequence += 1;
        let id = TransactionId::new(self.last_sequence);
        let record = TransactionRecord::new(id, account_no, kind, amount, balance_after, Utc::now())?;
        self.transactions.insert(id, record.clone());
        Ok(record)
    }

    /// Look up a transaction by id.
    pub fn transaction(&self, id: TransactionId) -> Option<&TransactionRecord> {
        self.transactions.get(&id).or_else(|| self.base.transactions.get(&id))
    }

    /// Look up a transaction for the constrained loan transitions, pulling
    /// it into the journal.
    pub fn transaction_mut(&mut self, id: TransactionId) -> Option<&mut TransactionRecord> {
        if !self.transactions.contains_key(&id) {
            let committed = self.base.transactions.get(&id)?;
            self.transactions.insert(id, committed.clone());
        }
        self.transactions.get_mut(&id)
    }

    /// All transactions for one account, in commit (= timestamp) order.
    ///
    /// Journal versions shadow their committed counterparts; records first
    /// appended in this transaction come last, in assignment order.
    pub fn transactions_for(&self, account_no: AccountNo) -> Vec<TransactionRecord> {
        let mut out: Vec<TransactionRecord> = self
            .base
            .transactions
            .values()
            .map(|t| self.transactions.get(&t.id()).unwrap_or(t))
            .filter(|t| t.account_no() == account_no)
            .cloned()
            .collect();
        out.extend(
            self.transactions
                .range(TransactionId::new(self.base.last_sequence + 1)..)
                .map(|(_, t)| t)
                .filter(|t| t.account_no() == account_no)
                .cloned(),
        );
        out
    }
}
