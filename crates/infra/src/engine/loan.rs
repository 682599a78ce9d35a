//! Loan lifecycle: approval and repayment of `Loan` transactions.
//!
//! A loan record walks `Requested` → `Approved` → `Paid`. Approval flips the
//! flag the repayment gate checks; repayment debits the paying account and
//! retires the record as `LoanPaid`, all in one atomic unit.

use ferrobank_core::{AccountNo, LedgerError, LedgerResult, TransactionId};
use ferrobank_ledger::{LoanState, TransactionRecord};

use crate::notifier::Notifier;
use crate::store::LedgerStore;

use super::LedgerEngine;

impl<S, N> LedgerEngine<S, N>
where
    S: LedgerStore,
    N: Notifier,
{
    /// Approve a requested loan, making it payable.
    ///
    /// The approval decision itself (who may approve, on what grounds) is an
    /// external concern; this records its outcome on the loan.
    pub fn approve_loan(&self, loan_id: TransactionId) -> LedgerResult<TransactionRecord> {
        let record = self.store.with_transaction(|txn| {
            let loan = txn
                .transaction_mut(loan_id)
                .ok_or(LedgerError::LoanNotFound(loan_id))?;
            if loan.loan_state().is_none() {
                return Err(LedgerError::LoanNotFound(loan_id));
            }
            loan.approve()?;
            Ok(loan.clone())
        })?;

        tracing::info!("loan approved: transaction={} amount={}", loan_id, record.amount());
        Ok(record)
    }

    /// Repay an approved loan from `paying_account_no`.
    ///
    /// Atomically debits the payer by the loan amount, snapshots the payer's
    /// new balance onto the loan record, and transitions its kind to
    /// `LoanPaid`. The funds check is strict: a balance exactly equal to the
    /// loan amount is rejected as insufficient.
    pub fn pay_loan(
        &self,
        loan_id: TransactionId,
        paying_account_no: AccountNo,
    ) -> LedgerResult<TransactionRecord> {
        let record = self.store.with_transaction(|txn| {
            let loan = txn
                .transaction(loan_id)
                .ok_or(LedgerError::LoanNotFound(loan_id))?;
            let amount = loan.amount();

            match loan.loan_state() {
                None => return Err(LedgerError::LoanNotFound(loan_id)),
                Some(LoanState::Requested) => return Err(LedgerError::LoanNotApproved(loan_id)),
                Some(LoanState::Paid) => {
                    return Err(LedgerError::validation(format!(
                        "loan {loan_id} is already repaid"
                    )));
                }
                Some(LoanState::Approved) => {}
            }

            let payer = txn.account_mut(paying_account_no)?;
            if amount >= payer.balance() {
                return Err(LedgerError::insufficient_funds(amount, payer.balance()));
            }
            let balance_after = payer.debit(amount)?;

            let loan = txn
                .transaction_mut(loan_id)
                .ok_or(LedgerError::LoanNotFound(loan_id))?;
            loan.mark_paid(balance_after)?;
            Ok(loan.clone())
        })?;

        tracing::info!(
            "loan repaid: transaction={} payer={} amount={} balance_after={}",
            loan_id,
            paying_account_no,
            record.amount(),
            record.balance_after(),
        );
        Ok(record)
    }
}
