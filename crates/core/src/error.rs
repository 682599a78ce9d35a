//! Ledger error model.

use thiserror::Error;

use crate::id::{AccountNo, TransactionId};
use crate::money::Money;

/// Result type used across the ledger core.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Validation failures are detected before any mutation and abort with zero
/// side effects; `Store` means the whole atomic unit was rolled back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A value failed validation (e.g. non-positive amount).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A debit would take the balance below zero.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    /// No account exists under this number.
    #[error("account not found: {0}")]
    AccountNotFound(AccountNo),

    /// Sender and recipient resolve to the same account.
    #[error("transfers to the sending account are not allowed")]
    SelfTransferNotAllowed,

    /// The id does not resolve to a payable loan transaction.
    #[error("loan not found: {0}")]
    LoanNotFound(TransactionId),

    /// Repayment attempted before the loan was approved.
    #[error("loan {0} has not been approved")]
    LoanNotApproved(TransactionId),

    /// Persistence/transaction failure; nothing was committed.
    #[error("store failure: {0}")]
    Store(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_funds(requested: Money, available: Money) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
