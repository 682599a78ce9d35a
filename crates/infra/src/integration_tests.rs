//! Integration tests for the full write path.
//!
//! Engine → LedgerStore → committed records → notifier/report.
//!
//! Verifies:
//! - Mutations and their audit records commit and roll back as one unit
//! - Notifier failures never disturb a committed mutation
//! - Concurrent withdrawals cannot overdraw an account

use std::sync::{Arc, Mutex};
use std::thread;

use ferrobank_core::{AccountNo, LedgerError, Money, UserId};
use ferrobank_ledger::{Account, TransactionKind};

use crate::engine::LedgerEngine;
use crate::notifier::{Notice, NoticeKind, Notifier, NotifierError};
use crate::report::{self, StatementSummary};
use crate::store::InMemoryLedgerStore;

/// Captures every notice for assertions.
#[derive(Debug, Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<Notice> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, notice: &Notice) -> Result<(), NotifierError> {
        self.sent.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// Refuses every delivery.
#[derive(Debug, Default)]
struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _notice: &Notice) -> Result<(), NotifierError> {
        Err(NotifierError::Delivery("smtp unreachable".to_string()))
    }
}

fn open_account(store: &InMemoryLedgerStore, no: u64, balance_minor: i64) -> (AccountNo, UserId) {
    let account_no = AccountNo::new(no);
    let owner = UserId::new();
    store
        .open_account(Account::open(account_no, owner, Money::from_minor(balance_minor)).unwrap())
        .unwrap();
    (account_no, owner)
}

fn init_logging() {
    ferrobank_observability::init();
}

#[test]
fn deposit_withdraw_transfer_walkthrough() {
    init_logging();
    let store = InMemoryLedgerStore::new();
    let (a, _) = open_account(&store, 1000, 10_000); // A: 100.00
    let (b, _) = open_account(&store, 2000, 0); // B: 0.00
    let engine = LedgerEngine::new(store, RecordingNotifier::default());

    // Deposit 50.00 into A.
    let deposit = engine.deposit(a, Money::from_minor(5_000)).unwrap();
    assert_eq!(deposit.kind(), TransactionKind::Deposit);
    assert_eq!(deposit.balance_after(), Money::from_minor(15_000));

    // Withdrawing 200.00 fails and changes nothing.
    let err = engine.withdraw(a, Money::from_minor(20_000)).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(engine.store().account(a).unwrap().balance(), Money::from_minor(15_000));

    // Transfer 30.00 from A to B.
    let receipt = engine.transfer(a, b, Money::from_minor(3_000)).unwrap();
    assert_eq!(engine.store().account(a).unwrap().balance(), Money::from_minor(12_000));
    assert_eq!(engine.store().account(b).unwrap().balance(), Money::from_minor(3_000));
    assert_eq!(receipt.debit.balance_after(), Money::from_minor(12_000));
    assert_eq!(receipt.credit.balance_after(), Money::from_minor(3_000));

    // Exactly one SendMoney on A and one ReceivedMoney on B, amounts matching.
    let a_kinds: Vec<_> = engine
        .store()
        .transactions_for(a)
        .unwrap()
        .iter()
        .map(|t| t.kind())
        .collect();
    assert_eq!(a_kinds, vec![TransactionKind::Deposit, TransactionKind::SendMoney]);
    let b_txns = engine.store().transactions_for(b).unwrap();
    assert_eq!(b_txns.len(), 1);
    assert_eq!(b_txns[0].kind(), TransactionKind::ReceivedMoney);
    assert_eq!(b_txns[0].amount(), Money::from_minor(3_000));
}

#[test]
fn every_committed_mutation_produces_exactly_one_notice() {
    let store = InMemoryLedgerStore::new();
    let (a, a_owner) = open_account(&store, 1000, 10_000);
    let (b, b_owner) = open_account(&store, 2000, 0);
    let engine = LedgerEngine::new(store, RecordingNotifier::default());

    engine.deposit(a, Money::from_minor(5_000)).unwrap();
    engine.withdraw(a, Money::from_minor(1_000)).unwrap();
    engine.request_loan(a, Money::from_minor(2_000)).unwrap();
    engine.transfer(a, b, Money::from_minor(500)).unwrap();

    // A failed operation must not notify.
    let _ = engine.withdraw(a, Money::from_minor(1_000_000));

    let sent = engine.notifier().sent();
    let kinds: Vec<_> = sent.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NoticeKind::Deposit,
            NoticeKind::Withdrawal,
            NoticeKind::LoanRequest,
            NoticeKind::SendMoney,
            NoticeKind::ReceivedMoney,
        ]
    );

    // Transfer notices carry the counterparty on both sides.
    let send = &sent[3];
    assert_eq!(send.user, a_owner);
    assert_eq!(send.counterparty, Some(b_owner));
    let received = &sent[4];
    assert_eq!(received.user, b_owner);
    assert_eq!(received.counterparty, Some(a_owner));
}

#[test]
fn notifier_failure_never_disturbs_the_committed_mutation() {
    init_logging();
    let store = InMemoryLedgerStore::new();
    let (a, _) = open_account(&store, 1000, 10_000);
    let engine = LedgerEngine::new(store, FailingNotifier);

    // The operation still succeeds; the failure is logged and swallowed.
    let record = engine.deposit(a, Money::from_minor(5_000)).unwrap();
    assert_eq!(record.balance_after(), Money::from_minor(15_000));
    assert_eq!(engine.store().account(a).unwrap().balance(), Money::from_minor(15_000));
}

#[test]
fn full_loan_lifecycle_against_the_report() {
    let store = InMemoryLedgerStore::new();
    let (a, _) = open_account(&store, 1000, 100_000);
    let engine = LedgerEngine::new(store, RecordingNotifier::default());

    let loan = engine.request_loan(a, Money::from_minor(40_000)).unwrap();
    engine.approve_loan(loan.id()).unwrap();
    engine.pay_loan(loan.id(), a).unwrap();

    let stmt = report::statement(engine.store(), a, None).unwrap();
    assert_eq!(stmt.summary, StatementSummary::CurrentBalance(Money::from_minor(60_000)));
    assert_eq!(stmt.transactions.len(), 1);
    assert_eq!(stmt.transactions[0].kind(), TransactionKind::LoanPaid);
    assert_eq!(stmt.transactions[0].balance_after(), Money::from_minor(60_000));
}

#[test]
fn concurrent_withdrawals_cannot_overdraw() {
    // Balance 100.00, eight threads each withdrawing 30.00: at most
    // floor(100/30) = 3 may succeed, and the final balance stays >= 0.
    let store = Arc::new(InMemoryLedgerStore::new());
    let (account_no, _) = open_account(&store, 1000, 10_000);
    let engine = Arc::new(LedgerEngine::new(store.clone(), crate::notifier::NoopNotifier));

    let amount = Money::from_minor(3_000);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            thread::spawn(move || engine.withdraw(account_no, amount).is_ok())
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|succeeded| *succeeded)
        .count();

    assert_eq!(successes, 3);
    let final_balance = store.account(account_no).unwrap().balance();
    assert_eq!(final_balance, Money::from_minor(10_000 - 3 * 3_000));
    assert!(final_balance >= Money::ZERO);

    // One withdrawal record per success, each with a consistent snapshot.
    let records = store.transactions_for(account_no).unwrap();
    assert_eq!(records.len(), 3);
    let mut balances: Vec<_> = records.iter().map(|r| r.balance_after()).collect();
    balances.sort();
    assert_eq!(
        balances,
        vec![
            Money::from_minor(1_000),
            Money::from_minor(4_000),
            Money::from_minor(7_000)
        ]
    );
}

#[test]
fn concurrent_opposing_transfers_do_not_deadlock_or_lose_updates() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let (a, _) = open_account(&store, 1000, 50_000);
    let (b, _) = open_account(&store, 2000, 50_000);
    let engine = Arc::new(LedgerEngine::new(store.clone(), crate::notifier::NoopNotifier));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            thread::spawn(move || {
                for _ in 0..25 {
                    engine.transfer(from, to, Money::from_minor(100)).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    // 50 transfers each way at 1.00: balances end where they started, and
    // money was neither created nor destroyed.
    let total = store.account(a).unwrap().balance() + store.account(b).unwrap().balance();
    assert_eq!(total, Money::from_minor(100_000));
    assert_eq!(store.account(a).unwrap().balance(), Money::from_minor(50_000));
    assert_eq!(store.account(b).unwrap().balance(), Money::from_minor(50_000));
}
