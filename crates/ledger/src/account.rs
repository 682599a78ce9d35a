use serde::{Deserialize, Serialize};

use ferrobank_core::{AccountNo, Entity, LedgerError, LedgerResult, Money, UserId};

/// A user's bank account.
///
/// Invariant: `balance >= 0` at every committed state. The balance is only
/// mutated through [`Account::credit`] and [`Account::debit`], and only while
/// the caller holds a store transaction; accounts are created by the external
/// account-opening flow and never deleted by this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    account_no: AccountNo,
    owner: UserId,
    balance: Money,
}

impl Account {
    /// Create an account as the account-opening flow would.
    ///
    /// The opening balance must not be negative; zero is fine.
    pub fn open(account_no: AccountNo, owner: UserId, opening_balance: Money) -> LedgerResult<Self> {
        if opening_balance < Money::ZERO {
            return Err(LedgerError::validation(
                "opening balance must not be negative",
            ));
        }
        Ok(Self {
            account_no,
            owner,
            balance: opening_balance,
        })
    }

    pub fn account_no(&self) -> AccountNo {
        self.account_no
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Add `amount` to the balance. Returns the new balance.
    ///
    /// Fails with [`LedgerError::Validation`] when the result would not fit
    /// in the minor-unit representation, leaving the account untouched.
    pub fn credit(&mut self, amount: Money) -> LedgerResult<Money> {
        ensure_positive(amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::validation("balance overflow"))?;
        Ok(self.balance)
    }

    /// Remove `amount` from the balance. Returns the new balance.
    ///
    /// Fails with [`LedgerError::InsufficientFunds`] when `amount` exceeds the
    /// current balance, leaving the account untouched.
    pub fn debit(&mut self, amount: Money) -> LedgerResult<Money> {
        ensure_positive(amount)?;
        let remaining = self
            .balance
            .checked_deduct(amount)
            .ok_or(LedgerError::insufficient_funds(amount, self.balance))?;
        self.balance = remaining;
        Ok(self.balance)
    }
}

impl Entity for Account {
    type Id = AccountNo;

    fn id(&self) -> &Self::Id {
        &self.account_no
    }
}

/// Amounts entering the ledger must be strictly positive.
pub(crate) fn ensure_positive(amount: Money) -> LedgerResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "amount must be positive, got {amount}"
        )))
    }
}
