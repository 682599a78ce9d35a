//! `ferrobank-ledger` — pure domain model of the banking ledger.
//!
//! Accounts, transaction records, and the loan state machine. No IO:
//! atomicity and persistence are the infra crate's concern; everything here
//! is deterministic validate-and-mutate logic.

pub mod account;
pub mod transaction;

pub use account::Account;
pub use transaction::{LoanState, TransactionKind, TransactionRecord};
