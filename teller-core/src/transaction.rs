//! Transaction records and the per-statement set builder.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::amount::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AccountType {
    #[serde(rename = "VISA")]
    Visa,
    #[serde(rename = "CHEQUING")]
    Chequing,
    #[serde(rename = "SAVINGS")]
    Savings,
}

/// Layout family a statement is printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementShape {
    /// Free-text transaction lines matched by pattern (credit card).
    Narrative,
    /// Rows pulled out by a page-count template (deposit accounts).
    Tabular,
}

impl AccountType {
    /// Account type named by a statement's parent directory.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "visa" => Some(AccountType::Visa),
            "chequing" => Some(AccountType::Chequing),
            "savings" => Some(AccountType::Savings),
            _ => None,
        }
    }

    pub fn shape(&self) -> StatementShape {
        match self {
            AccountType::Visa => StatementShape::Narrative,
            AccountType::Chequing | AccountType::Savings => StatementShape::Tabular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Visa => "VISA",
            AccountType::Chequing => "CHEQUING",
            AccountType::Savings => "SAVINGS",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger entry.
///
/// `sequence` is the ordinal of the record within its statement. It keeps
/// records that are otherwise identical (same day, text and amount) distinct
/// in a [`TransactionSet`] and carries no calendar meaning. Ordering is by
/// date, then sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transaction {
    date: NaiveDate,
    sequence: u32,
    account_type: AccountType,
    description: String,
    amount: Amount,
}

impl Transaction {
    pub fn new(
        account_type: AccountType,
        date: NaiveDate,
        sequence: u32,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            date,
            sequence,
            account_type,
            description: description.into(),
            amount,
        }
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Midnight of `date` plus `sequence` seconds. Unique per statement and
    /// increasing in document order for records sharing a date.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN) + Duration::seconds(i64::from(self.sequence))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{:<4} {:<8} {:>12}  {}",
            self.date,
            self.sequence,
            self.account_type,
            format!("{:.2}", self.amount),
            self.description
        )
    }
}

pub type TransactionSet = BTreeSet<Transaction>;

/// Collects one statement's transactions, numbering them in the order they
/// are added.
#[derive(Debug)]
pub struct TransactionSetBuilder {
    account_type: AccountType,
    next_sequence: u32,
    transactions: TransactionSet,
}

impl TransactionSetBuilder {
    pub fn new(account_type: AccountType) -> Self {
        Self {
            account_type,
            next_sequence: 0,
            transactions: TransactionSet::new(),
        }
    }

    /// Add a record and return the sequence number it was given.
    pub fn push(&mut self, date: NaiveDate, description: impl Into<String>, amount: Amount) -> u32 {
        let sequence = self.next_sequence;
        self.transactions.insert(Transaction::new(
            self.account_type,
            date,
            sequence,
            description,
            amount,
        ));
        self.next_sequence += 1;
        sequence
    }

    pub fn finish(self) -> TransactionSet {
        self.transactions
    }
}
