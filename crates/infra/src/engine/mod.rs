//! Transactional balance-mutation engine.
//!
//! Every operation validates, applies the balance change, and appends the
//! paired audit record within one store transaction; notifications go out
//! only after the commit. The engine never reads ambient session state —
//! account identity is an explicit parameter of every operation.

use ferrobank_core::{AccountNo, LedgerError, LedgerResult, Money, UserId};
use ferrobank_ledger::{TransactionKind, TransactionRecord};

use crate::notifier::{Notice, NoticeKind, Notifier};
use crate::store::LedgerStore;

pub mod loan;
pub mod transfer;

pub use transfer::TransferReceipt;

/// The ledger's write path: balance mutator, transfer coordinator, and loan
/// lifecycle over a shared [`LedgerStore`].
pub struct LedgerEngine<S, N> {
    store: S,
    notifier: N,
}

/// Single-account balance change applied by [`LedgerEngine::apply_balance_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BalanceChange {
    Deposit,
    Withdrawal,
    LoanRequest,
}

impl<S, N> LedgerEngine<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<S, N> LedgerEngine<S, N>
where
    S: LedgerStore,
    N: Notifier,
{
    /// Add `amount` to the account. Always succeeds for positive amounts.
    pub fn deposit(&self, account_no: AccountNo, amount: Money) -> LedgerResult<TransactionRecord> {
        let (record, owner) =
            self.apply_balance_change(account_no, BalanceChange::Deposit, amount)?;
        self.notify(Notice::new(owner, amount, NoticeKind::Deposit, None));
        Ok(record)
    }

    /// Remove `amount` from the account, failing with
    /// [`LedgerError::InsufficientFunds`] rather than overdrawing.
    pub fn withdraw(&self, account_no: AccountNo, amount: Money) -> LedgerResult<TransactionRecord> {
        let (record, owner) =
            self.apply_balance_change(account_no, BalanceChange::Withdrawal, amount)?;
        self.notify(Notice::new(owner, amount, NoticeKind::Withdrawal, None));
        Ok(record)
    }

    /// File a loan request: records a `Loan` transaction awaiting approval,
    /// without moving the balance.
    pub fn request_loan(
        &self,
        account_no: AccountNo,
        amount: Money,
    ) -> LedgerResult<TransactionRecord> {
        let (record, owner) =
            self.apply_balance_change(account_no, BalanceChange::LoanRequest, amount)?;
        self.notify(Notice::new(owner, amount, NoticeKind::LoanRequest, None));
        Ok(record)
    }

    /// Validate and apply one single-account mutation plus its audit record,
    /// atomically. Returns the committed record and the account owner (for
    /// the post-commit notice).
    fn apply_balance_change(
        &self,
        account_no: AccountNo,
        change: BalanceChange,
        amount: Money,
    ) -> LedgerResult<(TransactionRecord, UserId)> {
        if !amount.is_positive() {
            return Err(LedgerError::validation(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let (record, owner) = self.store.with_transaction(|txn| {
            let account = txn.account_mut(account_no)?;
            let (kind, balance_after) = match change {
                BalanceChange::Deposit => (TransactionKind::Deposit, account.credit(amount)?),
                BalanceChange::Withdrawal => (TransactionKind::Withdrawal, account.debit(amount)?),
                // A loan request moves no money; the snapshot is the balance
                // as it stands at request time.
                BalanceChange::LoanRequest => (TransactionKind::Loan, account.balance()),
            };
            let owner = account.owner();
            let record = txn.record(account_no, kind, amount, balance_after)?;
            Ok((record, owner))
        })?;

        tracing::info!(
            "{:?} committed: account={} amount={} balance_after={} transaction={}",
            record.kind(),
            account_no,
            amount,
            record.balance_after(),
            record.id(),
        );

        Ok((record, owner))
    }

    /// Fire-and-forget delivery: the mutation is already committed, so a
    /// refused notice is logged and swallowed.
    pub(crate) fn notify(&self, notice: Notice) {
        if let Err(e) = self.notifier.send(&notice) {
            tracing::warn!(
                "notification delivery failed (mutation already committed): {e}"
            );
        }
    }
}
