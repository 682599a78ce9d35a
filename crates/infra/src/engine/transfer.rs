//! Transfer coordinator: a two-account mutation in one atomic unit.
//!
//! Debits the sender, credits the recipient, and appends the paired
//! `SendMoney`/`ReceivedMoney` records inside a single store transaction —
//! all four effects commit together or none do. The store's single mutation
//! right is acquired once for the whole unit, so opposing concurrent
//! transfers cannot deadlock.

use ferrobank_core::{AccountNo, LedgerError, LedgerResult, Money};
use ferrobank_ledger::{TransactionKind, TransactionRecord};

use crate::notifier::{Notice, NoticeKind, Notifier};
use crate::store::LedgerStore;

use super::LedgerEngine;

/// The committed pair of records of one transfer: `debit` on the sender,
/// `credit` on the recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub debit: TransactionRecord,
    pub credit: TransactionRecord,
}

impl<S, N> LedgerEngine<S, N>
where
    S: LedgerStore,
    N: Notifier,
{
    /// Move `amount` from `from_no` to `to_no`.
    ///
    /// Fails with zero side effects on a non-positive amount
    /// ([`LedgerError::Validation`]), an unresolvable account
    /// ([`LedgerError::AccountNotFound`]), a transfer to the sending account
    /// ([`LedgerError::SelfTransferNotAllowed`]), or an overdraw
    /// ([`LedgerError::InsufficientFunds`]).
    pub fn transfer(
        &self,
        from_no: AccountNo,
        to_no: AccountNo,
        amount: Money,
    ) -> LedgerResult<TransferReceipt> {
        if !amount.is_positive() {
            return Err(LedgerError::validation(format!(
                "amount must be positive, got {amount}"
            )));
        }
        if from_no == to_no {
            return Err(LedgerError::SelfTransferNotAllowed);
        }

        let (receipt, sender_owner, recipient_owner) = self.store.with_transaction(|txn| {
            // Resolve the recipient before touching the sender, so an unknown
            // recipient aborts before any provisional write exists.
            let recipient_owner = txn.account(to_no)?.owner();

            let sender = txn.account_mut(from_no)?;
            let sender_owner = sender.owner();
            let sender_balance = sender.debit(amount)?;
            let debit = txn.record(from_no, TransactionKind::SendMoney, amount, sender_balance)?;

            let recipient_balance = txn.account_mut(to_no)?.credit(amount)?;
            let credit =
                txn.record(to_no, TransactionKind::ReceivedMoney, amount, recipient_balance)?;

            Ok((TransferReceipt { debit, credit }, sender_owner, recipient_owner))
        })?;

        tracing::info!(
            "transfer committed: from={} to={} amount={} debit={} credit={}",
            from_no,
            to_no,
            amount,
            receipt.debit.id(),
            receipt.credit.id(),
        );

        self.notify(Notice::new(
            sender_owner,
            amount,
            NoticeKind::SendMoney,
            Some(recipient_owner),
        ));
        self.notify(Notice::new(
            recipient_owner,
            amount,
            NoticeKind::ReceivedMoney,
            Some(sender_owner),
        ));

        Ok(receipt)
    }
}
