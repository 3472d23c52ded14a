use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A monetary balance.
///
/// Wrapper around `rust_decimal::Decimal` to keep financial arithmetic
/// type-safe. Balances may be driven to zero but never below it: the only
/// mutation path is [`Ledger::try_debit`], which refuses over-withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(Decimal);

/// A positive monetary amount charged by a payment.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s)
            .map_err(|e| PaymentError::ValidationError(format!("invalid amount '{s}': {e}")))?;
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One of the two named accounts payments draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Account {
    #[serde(rename = "Account 1")]
    Account1,
    #[serde(rename = "Account 2")]
    Account2,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Account1 => write!(f, "Account 1"),
            Account::Account2 => write!(f, "Account 2"),
        }
    }
}

impl FromStr for Account {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(' ', "").as_str() {
            "account1" => Ok(Account::Account1),
            "account2" => Ok(Account::Account2),
            other => Err(PaymentError::ValidationError(format!(
                "unknown account '{other}', expected account1 or account2"
            ))),
        }
    }
}

/// The two account balances. Mutated only by the payment engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub account1: Balance,
    pub account2: Balance,
}

impl Ledger {
    pub fn new(account1: Balance, account2: Balance) -> Self {
        Self { account1, account2 }
    }

    /// Both accounts seeded with the same opening balance.
    pub fn uniform(opening: Decimal) -> Self {
        Self::new(Balance::new(opening), Balance::new(opening))
    }

    pub fn balance(&self, account: Account) -> Balance {
        match account {
            Account::Account1 => self.account1,
            Account::Account2 => self.account2,
        }
    }

    /// Debits `amount` from `account` if covered by the current balance.
    ///
    /// Returns whether the funds were sufficient; on `false` the ledger is
    /// left untouched (the caller records a `Pending` payment instead).
    pub fn try_debit(&mut self, account: Account, amount: Amount) -> bool {
        let slot = match account {
            Account::Account1 => &mut self.account1,
            Account::Account2 => &mut self.account2,
        };
        if *slot >= amount.into() {
            *slot -= amount.into();
            true
        } else {
            false
        }
    }
}
