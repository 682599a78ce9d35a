//! Infrastructure layer: ledger storage, the transactional engine,
//! notification delivery, and the transaction report read model.

pub mod engine;
pub mod notifier;
pub mod report;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use engine::{LedgerEngine, TransferReceipt};
pub use notifier::{Notice, NoticeKind, Notifier, NotifierError, NoopNotifier, TracingNotifier};
pub use report::{AccountStatement, DateRange, StatementSummary, loans, statement};
pub use store::{InMemoryLedgerStore, LedgerStore, LedgerTxn};
