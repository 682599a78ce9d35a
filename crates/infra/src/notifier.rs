//! Notification boundary.
//!
//! The engine notifies account owners after a mutation has committed.
//! Delivery is fire-and-forget: a failure is logged by the caller and never
//! rolls back or retries the committed mutation. Actual transport (email,
//! push, ...) lives behind [`Notifier`]; the core only picks the template
//! kind and the canonical subject line.

use serde::Serialize;
use thiserror::Error;

use ferrobank_core::{Money, UserId};

/// Template selector for outbound notifications.
///
/// An explicit enum rather than a template path string, so the core stays
/// decoupled from whatever templating the transport uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Deposit,
    Withdrawal,
    LoanRequest,
    SendMoney,
    ReceivedMoney,
}

impl NoticeKind {
    /// Canonical subject line for this kind of notice.
    pub fn subject(&self) -> &'static str {
        match self {
            NoticeKind::Deposit => "Deposit Success!",
            NoticeKind::Withdrawal => "Withdraw Success!",
            NoticeKind::LoanRequest => "Request For A Loan",
            NoticeKind::SendMoney => "Send Money Successful!",
            NoticeKind::ReceivedMoney => "Received Money Successful!",
        }
    }
}

/// One outbound message: recipient, amount, template kind, and the
/// counterparty for transfer notices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub user: UserId,
    pub amount: Money,
    pub subject: &'static str,
    pub kind: NoticeKind,
    pub counterparty: Option<UserId>,
}

impl Notice {
    pub fn new(user: UserId, amount: Money, kind: NoticeKind, counterparty: Option<UserId>) -> Self {
        Self {
            user,
            amount,
            subject: kind.subject(),
            kind,
            counterparty,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Outbound notification transport.
pub trait Notifier: Send + Sync {
    fn send(&self, notice: &Notice) -> Result<(), NotifierError>;
}

/// Notifier that emits each notice as a structured log line.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn send(&self, notice: &Notice) -> Result<(), NotifierError> {
        tracing::info!(
            "notice: kind={:?} user={} amount={} subject={:?} counterparty={:?}",
            notice.kind,
            notice.user,
            notice.amount,
            notice.subject,
            notice.counterparty,
        );
        Ok(())
    }
}

/// Notifier that drops everything (tests, embedders without a transport).
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn send(&self, _notice: &Notice) -> Result<(), NotifierError> {
        Ok(())
    }
}
