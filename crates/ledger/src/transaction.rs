use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ferrobank_core::{AccountNo, LedgerError, LedgerResult, Money, TransactionId};

use crate::account::ensure_positive;

/// What a transaction did to the account balance.
///
/// A closed enum: the wire/report form is the snake_case name, never a
/// numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Loan,
    LoanPaid,
    SendMoney,
    ReceivedMoney,
}

/// Lifecycle of a loan transaction.
///
/// `Requested` → `Approved` → `Paid`; `Paid` is terminal. The state is
/// derived from the record's kind + approval flag rather than stored
/// separately, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanState {
    Requested,
    Approved,
    Paid,
}

/// Immutable audit record of one balance-affecting event.
///
/// Created by the store atomically with the balance write it documents;
/// never deleted. After commit only the loan transitions mutate a record:
/// the approval flag flips once, and the kind moves `Loan` → `LoanPaid`
/// exactly once when the loan is repaid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    id: TransactionId,
    account_no: AccountNo,
    amount: Money,
    kind: TransactionKind,
    balance_after: Money,
    timestamp: DateTime<Utc>,
    loan_approved: bool,
}

impl TransactionRecord {
    /// Build a record for a just-applied mutation.
    ///
    /// `balance_after` is the account balance immediately after the event;
    /// `id` and `timestamp` come from the committing store.
    pub fn new(
        id: TransactionId,
        account_no: AccountNo,
        kind: TransactionKind,
        amount: Money,
        balance_after: Money,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<Self> {
        ensure_positive(amount)?;
        Ok(Self {
            id,
            account_no,
            amount,
            kind,
            balance_after,
            timestamp,
            loan_approved: false,
        })
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn account_no(&self) -> AccountNo {
        self.account_no
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn balance_after(&self) -> Money {
        self.balance_after
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn loan_approved(&self) -> bool {
        self.loan_approved
    }

    /// Loan lifecycle state, `None` for non-loan kinds.
    pub fn loan_state(&self) -> Option<LoanState> {
        match self.kind {
            TransactionKind::Loan if self.loan_approved => Some(LoanState::Approved),
            TransactionKind::Loan => Some(LoanState::Requested),
            TransactionKind::LoanPaid => Some(LoanState::Paid),
            _ => None,
        }
    }

    /// Flip the approval flag: `Requested` → `Approved`, exactly once.
    pub fn approve(&mut self) -> LedgerResult<()> {
        match self.loan_state() {
            Some(LoanState::Requested) => {
                self.loan_approved = true;
                Ok(())
            }
            Some(LoanState::Approved) => {
                Err(LedgerError::validation(format!("loan {} is already approved", self.id)))
            }
            Some(LoanState::Paid) => {
                Err(LedgerError::validation(format!("loan {} is already repaid", self.id)))
            }
            None => Err(LedgerError::validation(format!(
                "transaction {} is not a loan",
                self.id
            ))),
        }
    }

    /// Settle the loan: `Approved` → `Paid`, recording the payer's balance
    /// after the repayment debit.
    pub fn mark_paid(&mut self, balance_after: Money) -> LedgerResult<()> {
        match self.loan_state() {
            Some(LoanState::Approved) => {
                self.kind = TransactionKind::LoanPaid;
                self.balance_after = balance_after;
                Ok(())
            }
            Some(LoanState::Requested) => Err(LedgerError::LoanNotApproved(self.id)),
            Some(LoanState::Paid) => {
                Err(LedgerError::validation(format!("loan {} is already repaid", self.id)))
            }
            None => Err(LedgerError::validation(format!(
                "transaction {} is not a loan",
                self.id
            ))),
        }
    }
}
