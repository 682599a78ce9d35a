//! Transaction report read model.
//!
//! A read-only view over committed data for statements and range reports.
//! Never part of the write path: it runs inside a store transaction purely
//! for a consistent snapshot.

use chrono::{DateTime, NaiveDate, Utc};

use ferrobank_core::{AccountNo, LedgerError, LedgerResult, Money};
use ferrobank_ledger::TransactionRecord;

use crate::store::LedgerStore;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        if start > end {
            return Err(LedgerError::validation(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let date = timestamp.date_naive();
        self.start <= date && date <= self.end
    }
}

/// The aggregate a statement reports alongside its transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementSummary {
    /// Sum of transaction amounts over the requested range.
    RangeTotal(Money),
    /// Current committed balance (no range requested).
    CurrentBalance(Money),
}

/// One account's transaction listing plus its summary figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatement {
    pub account_no: AccountNo,
    pub transactions: Vec<TransactionRecord>,
    pub summary: StatementSummary,
}

/// Build a statement for `account_no`.
///
/// With a range: the account's transactions within the range (commit order)
/// and the sum of their amounts. Without: the full history and the current
/// balance.
pub fn statement<S: LedgerStore>(
    store: &S,
    account_no: AccountNo,
    range: Option<DateRange>,
) -> LedgerResult<AccountStatement> {
    store.with_transaction(|txn| {
        let balance = txn.account(account_no)?.balance();
        let mut transactions = txn.transactions_for(account_no);

        let summary = match range {
            Some(range) => {
                transactions.retain(|t| range.contains(t.timestamp()));
                StatementSummary::RangeTotal(transactions.iter().map(|t| t.amount()).sum())
            }
            None => StatementSummary::CurrentBalance(balance),
        };

        Ok(AccountStatement {
            account_no,
            transactions,
            summary,
        })
    })
}

/// List `account_no`'s loan records, in commit order.
///
/// Covers the whole lifecycle: requested and approved loans keep their
/// original record, repaid ones appear as the paid record it became. Use
/// [`TransactionRecord::loan_state`] on each entry for the current state.
pub fn loans<S: LedgerStore>(
    store: &S,
    account_no: AccountNo,
) -> LedgerResult<Vec<TransactionRecord>> {
    store.with_transaction(|txn| {
        txn.account(account_no)?;
        Ok(txn
            .transactions_for(account_no)
            .into_iter()
            .filter(|t| t.loan_state().is_some())
            .collect())
    })
}
